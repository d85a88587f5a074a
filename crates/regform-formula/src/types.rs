//! Formula data model.
//!
//! A formula is an ordered list of terms as authored in the event
//! configuration. The JSON shape is camelCase:
//! `{"type": "customField", "fieldName": "adults"}`.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize, Serializer};

/// Live field values keyed by field name.
pub type FieldMap = HashMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Term kind
// ---------------------------------------------------------------------------

/// What a term contributes to the formula.
///
/// Unknown kinds are kept as `Other` so that the evaluator can treat them
/// as field references instead of rejecting the whole formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// A numeric literal carried in `operationName`.
    Number,
    /// A reference to another field's value via `fieldName`.
    CustomField,
    /// An operator change carried in `operationName`.
    Operation,
    /// Anything else (including a missing `type`).
    Other(String),
}

impl TermKind {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::CustomField => "customField",
            Self::Operation => "operation",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Returns `true` for the three documented kinds.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for TermKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for TermKind {
    fn from(s: &str) -> Self {
        match s {
            "number" => Self::Number,
            "customField" => Self::CustomField,
            "operation" => Self::Operation,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TermKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TermKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = Scalar::deserialize(deserializer)?.into_text();
        Ok(text.map(|s| Self::from(s.as_str())).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Arithmetic operator applied to the running result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Resolve an `operationName`. Absent or unknown names fall back to `Add`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("-") => Self::Subtract,
            Some("*") => Self::Multiply,
            Some("/") => Self::Divide,
            _ => Self::Add,
        }
    }

    /// Returns `true` if `name` is one of `+ - * /`.
    pub fn is_known(name: &str) -> bool {
        matches!(name, "+" | "-" | "*" | "/")
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Apply the operator, returning `None` when the step must be skipped:
    /// division by zero, or a result that is not finite.
    pub fn apply(self, lhs: f64, rhs: f64) -> Option<f64> {
        let out = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => {
                if rhs == 0.0 {
                    return None;
                }
                lhs / rhs
            }
        };
        out.is_finite().then_some(out)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// One entry in a formula.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    /// Term kind (`number`, `customField`, `operation`).
    #[serde(rename = "type", default)]
    pub kind: TermKind,

    /// Operator symbol for operations, literal text for numbers.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_name: Option<String>,

    /// Referenced field name for `customField` terms.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_name: Option<String>,
}

impl Term {
    pub fn number(literal: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Number,
            operation_name: Some(literal.into()),
            field_name: None,
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self {
            kind: TermKind::CustomField,
            operation_name: None,
            field_name: Some(name.into()),
        }
    }

    pub fn operation(symbol: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Operation,
            operation_name: Some(symbol.into()),
            field_name: None,
        }
    }

    /// A slot that is present but not a term object, such as `"x"` or `7`.
    /// It reads as 0 under the operator in effect.
    pub fn unreadable() -> Self {
        Self {
            kind: TermKind::Other(UNREADABLE.to_string()),
            operation_name: None,
            field_name: None,
        }
    }

    /// Returns `true` if this term changes the operator rather than
    /// contributing a value.
    pub fn is_operation(&self) -> bool {
        self.kind == TermKind::Operation
    }
}

/// Stand-in text for a name that is not a scalar (an object or array).
///
/// It is never a valid operator, number literal, or field name, so such a
/// term falls back to `+`, reads as 0, or is an unknown field reference.
pub const UNREADABLE: &str = "<unreadable>";

/// Any JSON/TOML value, read as text where possible.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null(()),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null(()) => None,
            Self::Other(_) => Some(UNREADABLE.to_string()),
        }
    }
}

/// Accept any value for name fields: scalars become text, `null` becomes
/// `None`, objects and arrays become [`UNREADABLE`].
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Scalar::deserialize(deserializer)?.into_text())
}

// ---------------------------------------------------------------------------
// Formula
// ---------------------------------------------------------------------------

/// An ordered sequence of terms. `null` slots are kept as `None` and
/// skipped during evaluation; any other entry that is not a term object
/// becomes [`Term::unreadable`] and reads as 0.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Formula {
    terms: Vec<Option<Term>>,
}

impl Formula {
    pub fn new(terms: Vec<Term>) -> Self {
        Self {
            terms: terms.into_iter().map(Some).collect(),
        }
    }

    /// Build a formula that may contain missing slots.
    pub fn from_slots(terms: Vec<Option<Term>>) -> Self {
        Self { terms }
    }

    /// Present terms in order, with their slot index.
    pub fn terms(&self) -> impl Iterator<Item = (usize, &Term)> {
        self.terms
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (i, t)))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<'de> Deserialize<'de> for Formula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Slot {
            Term(Term),
            Junk(IgnoredAny),
        }

        // Only `null` is a missing slot; anything else takes part in evaluation.
        let slots: Vec<Option<Slot>> = Vec::deserialize(deserializer)
            .map_err(|e| de::Error::custom(format!("formula must be a list of terms: {e}")))?;
        Ok(Self {
            terms: slots
                .into_iter()
                .map(|slot| {
                    slot.map(|s| match s {
                        Slot::Term(t) => t,
                        Slot::Junk(_) => Term::unreadable(),
                    })
                })
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while loading formula files.
///
/// Evaluation itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
