//! Registration field definitions.

use regform_formula::Formula;
use serde::{Deserialize, Serialize};

use crate::enums::{FieldType, ValueType};

/// One choice of an option, checkbox-group or radio-group field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    /// Key of the choice. For checkbox groups this is also the field-map key
    /// holding the checkbox state.
    pub field_name: String,

    /// Label shown to the registrant.
    #[serde(default)]
    pub label_name: String,
}

/// A single field of an event's registration form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationField {
    /// Key of the field in the field map.
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub value_type: ValueType,

    /// Value used when `value_type` is `fixed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_value: Option<serde_json::Value>,

    /// Computation used when `value_type` is `dynamic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<Formula>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,

    /// Must be filled before the form can be submitted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl RegistrationField {
    /// Label for display: `displayName`, falling back to `name`.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.value_type == ValueType::Dynamic
    }

    /// Find an option by its `fieldName`.
    pub fn option(&self, field_name: &str) -> Option<&FieldOption> {
        self.options.iter().find(|o| o.field_name == field_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_dynamic_field() {
        let json = r#"{
            "name": "total",
            "displayName": "Total",
            "type": "number",
            "valueType": "dynamic",
            "formula": [
                {"type": "customField", "fieldName": "tickets"},
                {"type": "operation", "operationName": "*"},
                {"type": "number", "operationName": "20"}
            ]
        }"#;
        let field: RegistrationField = serde_json::from_str(json).unwrap();
        assert_eq!(field.field_type, FieldType::Number);
        assert!(field.is_dynamic());
        assert_eq!(field.formula.as_ref().map(Formula::len), Some(3));
        assert!(!field.required);
    }

    #[test]
    fn deserialize_defaults() {
        let field: RegistrationField = serde_json::from_str(r#"{"name": "comments"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::Text);
        assert_eq!(field.value_type, ValueType::UserInput);
        assert_eq!(field.label(), "comments");
    }

    #[test]
    fn option_lookup() {
        let json = r#"{
            "name": "extras",
            "type": "checkBoxGroup",
            "options": [
                {"fieldName": "dinner", "labelName": "Dinner"},
                {"fieldName": "shirt", "labelName": "T-shirt"}
            ]
        }"#;
        let field: RegistrationField = serde_json::from_str(json).unwrap();
        assert_eq!(field.option("shirt").map(|o| o.label_name.as_str()), Some("T-shirt"));
        assert!(field.option("parking").is_none());
    }

    #[test]
    fn serialize_omits_empty_parts() {
        let field = RegistrationField {
            name: "email".into(),
            display_name: "Email".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "email",
                "displayName": "Email",
                "type": "text",
                "valueType": "userInput"
            })
        );
    }
}
