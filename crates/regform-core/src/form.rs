//! Live form state for one registration.
//!
//! The state owns the field map. Every accepted edit re-evaluates all
//! dynamic fields in declaration order; each result is written back before
//! the next dynamic field is evaluated, so a formula may read the output of
//! an earlier dynamic field.

use regform_formula::{FieldMap, evaluate};
use serde_json::Value;
use tracing::debug;

use crate::enums::{FieldType, ValueType};
use crate::event::{EventError, EventForm};

/// Field values of a registration in progress.
#[derive(Debug, Clone)]
pub struct FormState<'a> {
    form: &'a EventForm,
    values: FieldMap,
}

impl<'a> FormState<'a> {
    /// Seed a new state: fixed fields get their `fixedValue`, booleans and
    /// checkbox options start unchecked, then dynamic fields are computed.
    pub fn new(form: &'a EventForm) -> Self {
        let mut values = FieldMap::new();
        for field in &form.fields {
            if field.value_type == ValueType::Fixed {
                if let Some(ref fixed) = field.fixed_value {
                    values.insert(field.name.clone(), fixed.clone());
                }
                continue;
            }
            match field.field_type {
                FieldType::Boolean if field.value_type.is_editable() => {
                    values.insert(field.name.clone(), Value::Bool(false));
                }
                FieldType::CheckBoxGroup => {
                    for option in &field.options {
                        values.insert(option.field_name.clone(), Value::Bool(false));
                    }
                }
                _ => {}
            }
        }

        let mut state = Self { form, values };
        state.recompute();
        state
    }

    /// Set a user-editable value and recompute dynamic fields.
    ///
    /// Accepts names of user-input fields and option names of checkbox
    /// groups. Fixed and dynamic fields are read-only.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), EventError> {
        self.check_editable(name)?;
        debug!(field = name, %value, "field changed");
        self.values.insert(name.to_string(), value);
        self.recompute();
        Ok(())
    }

    /// Clear a user-editable value and recompute dynamic fields.
    pub fn clear(&mut self, name: &str) -> Result<(), EventError> {
        self.check_editable(name)?;
        self.values.remove(name);
        self.recompute();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn values(&self) -> &FieldMap {
        &self.values
    }

    /// Computed values of the dynamic fields, in declaration order.
    pub fn dynamic_values(&self) -> Vec<(&str, f64)> {
        self.form
            .dynamic_fields()
            .map(|f| {
                let value = self.values.get(&f.name).and_then(Value::as_f64).unwrap_or(0.0);
                (f.name.as_str(), value)
            })
            .collect()
    }

    /// Required user-input fields that have no value yet.
    pub fn missing_required(&self) -> Vec<&str> {
        self.form
            .fields
            .iter()
            .filter(|f| f.required && f.value_type.is_editable())
            .filter(|f| is_blank(self.values.get(&f.name)))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Final field values for submission, dynamic results included.
    pub fn submission(&self) -> Result<serde_json::Map<String, Value>, EventError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(EventError::MissingRequired(
                missing.into_iter().map(String::from).collect(),
            ));
        }
        let mut out = serde_json::Map::new();
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        for key in keys {
            out.insert(key.clone(), self.values[key].clone());
        }
        Ok(out)
    }

    fn check_editable(&self, name: &str) -> Result<(), EventError> {
        if let Some(field) = self.form.field(name) {
            if field.value_type.is_editable() && field.field_type != FieldType::CheckBoxGroup {
                return Ok(());
            }
            return Err(EventError::ReadOnlyField(name.to_string()));
        }
        let is_checkbox_option = self.form.fields.iter().any(|f| {
            f.field_type == FieldType::CheckBoxGroup
                && f.value_type.is_editable()
                && f.option(name).is_some()
        });
        if is_checkbox_option {
            Ok(())
        } else {
            Err(EventError::UnknownField(name.to_string()))
        }
    }

    fn recompute(&mut self) {
        for field in self.form.dynamic_fields() {
            let Some(formula) = field.formula.as_ref() else {
                continue;
            };
            let result = evaluate(formula, &self.values);
            debug!(field = %field.name, result, "recomputed dynamic field");
            self.values.insert(field.name.clone(), Value::from(result));
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}
