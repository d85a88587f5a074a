//! Formula evaluator for computed registration fields.
//!
//! A formula is an ordered list of terms (number literals, field references,
//! operator changes) stored with an event's registration form. Evaluating it
//! against the live field values yields the value of a dynamic field such as
//! a total price. Evaluation is pure and total: it always returns a finite
//! number.

pub mod engine;
pub mod parser;
pub mod types;
pub mod value;

pub use engine::{evaluate, evaluate_traced, referenced_fields, render};
pub use types::{FieldMap, Formula, FormulaError, Operator, Term, TermKind};
