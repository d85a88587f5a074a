//! Formula evaluation: a left-to-right fold over the terms.
//!
//! The state carried between terms is `(result, operator)`. Operation terms
//! only replace the operator; value terms apply it to the result. There is
//! no precedence: `2 + 3 * 4` evaluates to 20.

use serde::Serialize;
use tracing::trace;

use crate::types::{FieldMap, Formula, Operator, Term, TermKind};
use crate::value::{parse_numeric, to_number};

/// One value term applied during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    /// Slot index of the term in the formula.
    pub index: usize,
    /// Operator in effect for this term.
    pub operator: Operator,
    /// Rendered operand: the literal or the field name.
    pub source: String,
    /// Resolved numeric operand.
    pub operand: f64,
    /// Running result after this term.
    pub result: f64,
    /// `true` if the operator was not applied (division by zero, overflow).
    pub skipped: bool,
}

/// Result of [`evaluate_traced`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub result: f64,
    pub steps: Vec<TraceStep>,
}

/// Evaluate a formula against the current field values.
///
/// Never fails: missing terms are skipped, unknown operators add, missing or
/// non-numeric field values count as 0, and division by zero leaves the
/// result unchanged. The returned number is always finite.
pub fn evaluate(formula: &Formula, fields: &FieldMap) -> f64 {
    fold_terms(formula, fields, |_| {})
}

/// Evaluate a formula and record every applied value term.
pub fn evaluate_traced(formula: &Formula, fields: &FieldMap) -> Trace {
    let mut steps = Vec::new();
    let result = fold_terms(formula, fields, |applied| {
        steps.push(TraceStep {
            index: applied.index,
            operator: applied.operator,
            source: operand_source(applied.term),
            operand: applied.operand,
            result: applied.result,
            skipped: applied.skipped,
        })
    });
    Trace { result, steps }
}

/// A value term as seen by the fold; turned into a [`TraceStep`] only when
/// tracing.
struct Applied<'a> {
    index: usize,
    term: &'a Term,
    operator: Operator,
    operand: f64,
    result: f64,
    skipped: bool,
}

fn fold_terms<'a, F>(formula: &'a Formula, fields: &FieldMap, mut observe: F) -> f64
where
    F: FnMut(Applied<'a>),
{
    let (result, _) = formula
        .terms()
        .fold((0.0, Operator::Add), |(result, operator), (index, term)| {
            if term.is_operation() {
                return (result, Operator::from_name(term.operation_name.as_deref()));
            }

            let operand = resolve_operand(term, fields);
            let applied = operator.apply(result, operand);
            let next = applied.unwrap_or(result);
            if applied.is_none() {
                trace!(index, %operator, operand, "skipped formula step");
            }
            observe(Applied {
                index,
                term,
                operator,
                operand,
                result: next,
                skipped: applied.is_none(),
            });
            (next, operator)
        });
    result
}

/// Numeric value of a non-operation term.
fn resolve_operand(term: &Term, fields: &FieldMap) -> f64 {
    match term.kind {
        TermKind::Number => term
            .operation_name
            .as_deref()
            .map(parse_numeric)
            .unwrap_or(0.0),
        _ => term
            .field_name
            .as_deref()
            .and_then(|name| fields.get(name))
            .map(to_number)
            .unwrap_or(0.0),
    }
}

fn operand_source(term: &Term) -> String {
    match term.kind {
        TermKind::Number => term
            .operation_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("0")
            .to_string(),
        _ => term.field_name.clone().unwrap_or_else(|| "0".to_string()),
    }
}

/// Field names referenced by value terms, deduplicated in first-seen order.
pub fn referenced_fields(formula: &Formula) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (_, term) in formula.terms() {
        if term.is_operation() || term.kind == TermKind::Number {
            continue;
        }
        if let Some(name) = term.field_name.as_deref() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Render a formula as a left-to-right infix expression.
///
/// Implicit operators are made explicit: consecutive value terms repeat the
/// operator in effect, and a leading non-additive operator is applied to 0.
/// Trailing operation terms have no effect and are dropped. An empty formula
/// renders as `0`.
pub fn render(formula: &Formula) -> String {
    let mut out = String::new();
    let mut operator = Operator::Add;
    for (_, term) in formula.terms() {
        if term.is_operation() {
            operator = Operator::from_name(term.operation_name.as_deref());
            continue;
        }
        let source = operand_source(term);
        if out.is_empty() {
            if operator != Operator::Add {
                out.push_str("0 ");
                out.push_str(operator.symbol());
                out.push(' ');
            }
        } else {
            out.push(' ');
            out.push_str(operator.symbol());
            out.push(' ');
        }
        out.push_str(&source);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}
