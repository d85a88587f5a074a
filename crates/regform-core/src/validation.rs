//! Event form validation rules.
//!
//! [`lint`] reports every problem it finds; [`validate`] stops at the first
//! error. Warnings describe configurations that load and evaluate fine but
//! probably do not compute what the author intended.

use std::collections::{HashMap, HashSet};

use regform_formula::value::numeric_literal;
use regform_formula::{Formula, Operator, Term, TermKind};
use serde::Serialize;

use crate::enums::ValueType;
use crate::event::EventForm;
use crate::field::RegistrationField;

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("field #{0} has no name")]
    EmptyName(usize),

    #[error("duplicate field name: {0}")]
    DuplicateName(String),

    #[error("field '{field}' has unknown type '{value}'")]
    UnknownFieldType { field: String, value: String },

    #[error("field '{field}' has unknown value type '{value}'")]
    UnknownValueType { field: String, value: String },

    #[error("dynamic field '{0}' has no formula")]
    DynamicWithoutFormula(String),

    #[error("fixed field '{0}' has no fixedValue")]
    FixedWithoutValue(String),

    #[error("field '{0}' needs at least one option")]
    MissingOptions(String),
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Field the finding is about (empty for unnamed fields).
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    fn error(field: &str, err: ValidationError) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: err.to_string(),
        }
    }

    fn warning(field: &str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message,
        }
    }
}

/// Validate an event form, returning the first structural error.
pub fn validate(form: &EventForm) -> Result<(), ValidationError> {
    match structural_errors(form).into_iter().next() {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}

/// Check an event form for errors and suspicious formulas.
///
/// Errors come first in field order, followed by warnings in field order.
pub fn lint(form: &EventForm) -> Vec<Diagnostic> {
    let mut out: Vec<Diagnostic> = structural_errors(form)
        .into_iter()
        .map(|(field, err)| Diagnostic::error(&field, err))
        .collect();

    let known = known_keys(form);
    let positions: HashMap<&str, usize> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name.as_str(), i))
        .collect();

    for (pos, field) in form.fields.iter().enumerate() {
        let Some(formula) = field.formula.as_ref() else {
            continue;
        };
        if !field.is_dynamic() {
            out.push(Diagnostic::warning(
                &field.name,
                format!(
                    "formula is ignored because valueType is '{}'",
                    field.value_type
                ),
            ));
            continue;
        }
        lint_formula(form, field, pos, formula, &known, &positions, &mut out);
    }
    out
}

/// Returns `true` if any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Every key a formula may reference: field names plus checkbox option names.
fn known_keys(form: &EventForm) -> HashSet<&str> {
    let mut keys = HashSet::new();
    for field in &form.fields {
        keys.insert(field.name.as_str());
        for option in &field.options {
            keys.insert(option.field_name.as_str());
        }
    }
    keys
}

fn structural_errors(form: &EventForm) -> Vec<(String, ValidationError)> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, field) in form.fields.iter().enumerate() {
        let name = field.name.as_str();
        if name.trim().is_empty() {
            errors.push((String::new(), ValidationError::EmptyName(i + 1)));
        } else if !seen.insert(name) {
            errors.push((name.to_string(), ValidationError::DuplicateName(name.to_string())));
        }
        for option in &field.options {
            let key = option.field_name.as_str();
            if !key.is_empty() && !seen.insert(key) {
                errors.push((name.to_string(), ValidationError::DuplicateName(key.to_string())));
            }
        }

        errors.extend(field_errors(field).into_iter().map(|e| (name.to_string(), e)));
    }
    errors
}

fn field_errors(field: &RegistrationField) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = field.name.clone();

    if !field.field_type.is_builtin() {
        errors.push(ValidationError::UnknownFieldType {
            field: name.clone(),
            value: field.field_type.to_string(),
        });
    }
    match &field.value_type {
        ValueType::Dynamic if field.formula.is_none() => {
            errors.push(ValidationError::DynamicWithoutFormula(name.clone()));
        }
        ValueType::Fixed if field.fixed_value.is_none() => {
            errors.push(ValidationError::FixedWithoutValue(name.clone()));
        }
        ValueType::Custom(value) => errors.push(ValidationError::UnknownValueType {
            field: name.clone(),
            value: value.clone(),
        }),
        _ => {}
    }
    if field.field_type.has_options() && field.options.is_empty() {
        errors.push(ValidationError::MissingOptions(name));
    }
    errors
}

fn lint_formula(
    form: &EventForm,
    field: &RegistrationField,
    pos: usize,
    formula: &Formula,
    known: &HashSet<&str>,
    positions: &HashMap<&str, usize>,
    out: &mut Vec<Diagnostic>,
) {
    let name = field.name.as_str();
    let mut operator = Operator::Add;
    let mut last_was_operation = false;

    for (index, term) in formula.terms() {
        let slot = index + 1;
        match &term.kind {
            TermKind::Operation => {
                let symbol = term.operation_name.as_deref().unwrap_or("");
                if !Operator::is_known(symbol) {
                    out.push(Diagnostic::warning(
                        name,
                        format!("term {slot}: unknown operator '{symbol}' is treated as '+'"),
                    ));
                }
                operator = Operator::from_name(term.operation_name.as_deref());
                last_was_operation = true;
                continue;
            }
            TermKind::Number => {
                let literal = term.operation_name.as_deref().unwrap_or("");
                let value = numeric_literal(literal);
                if value.is_none() {
                    out.push(Diagnostic::warning(
                        name,
                        format!("term {slot}: '{literal}' is not a number and counts as 0"),
                    ));
                }
                if value.unwrap_or(0.0) == 0.0 && operator == Operator::Divide {
                    out.push(Diagnostic::warning(
                        name,
                        format!("term {slot}: division by zero is skipped"),
                    ));
                }
            }
            _ if *term == Term::unreadable() => {
                out.push(Diagnostic::warning(
                    name,
                    format!("term {slot}: entry is not a term and counts as 0"),
                ));
            }
            kind => {
                if let TermKind::Other(other) = kind {
                    out.push(Diagnostic::warning(
                        name,
                        format!("term {slot}: unknown term type '{other}' is read as a field reference"),
                    ));
                }
                lint_reference(form, name, pos, slot, term.field_name.as_deref(), known, positions, out);
            }
        }
        last_was_operation = false;
    }

    if last_was_operation {
        out.push(Diagnostic::warning(
            name,
            "formula ends with an operation that has no effect".to_string(),
        ));
    }
}

#[allow(clippy::too_many_arguments)]
fn lint_reference(
    form: &EventForm,
    name: &str,
    pos: usize,
    slot: usize,
    reference: Option<&str>,
    known: &HashSet<&str>,
    positions: &HashMap<&str, usize>,
    out: &mut Vec<Diagnostic>,
) {
    let Some(reference) = reference.filter(|r| !r.is_empty()) else {
        out.push(Diagnostic::warning(
            name,
            format!("term {slot}: field reference has no fieldName and counts as 0"),
        ));
        return;
    };

    if reference == name {
        out.push(Diagnostic::warning(
            name,
            format!("term {slot}: formula references its own field"),
        ));
    } else if !known.contains(reference) {
        out.push(Diagnostic::warning(
            name,
            format!("term {slot}: unknown field '{reference}' counts as 0"),
        ));
    } else if let Some(&target) = positions.get(reference) {
        if target > pos && form.fields[target].is_dynamic() {
            out.push(Diagnostic::warning(
                name,
                format!(
                    "term {slot}: dynamic field '{reference}' is computed later and is read before it updates"
                ),
            ));
        }
    }
}
