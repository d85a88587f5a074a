//! Parse standalone formula files (JSON and TOML).
//!
//! JSON files may hold a bare array of terms or an object with a `formula`
//! key. TOML has no top-level arrays, so TOML files always use the
//! `[[formula]]` table-array form.

use std::path::Path;

use serde::Deserialize;

use crate::types::{Formula, FormulaError};

#[derive(Deserialize)]
#[serde(untagged)]
enum FormulaDoc {
    Bare(Formula),
    Wrapped { formula: Formula },
}

impl FormulaDoc {
    fn into_formula(self) -> Formula {
        match self {
            Self::Bare(f) | Self::Wrapped { formula: f } => f,
        }
    }
}

/// Parse a formula from a JSON string.
pub fn parse_json(content: &str) -> Result<Formula, FormulaError> {
    serde_json::from_str::<FormulaDoc>(content)
        .map(FormulaDoc::into_formula)
        .map_err(|_| {
            FormulaError::Parse(
                "expected a JSON array of terms or an object with a 'formula' array".to_string(),
            )
        })
}

/// Parse a formula from a TOML string.
pub fn parse_toml(content: &str) -> Result<Formula, FormulaError> {
    #[derive(Deserialize)]
    struct Wrapped {
        #[serde(default)]
        formula: Formula,
    }

    toml::from_str::<Wrapped>(content)
        .map(|w| w.formula)
        .map_err(|e| FormulaError::Parse(e.to_string()))
}

/// Parse formula text, trying JSON first and then TOML.
pub fn parse_any(content: &str) -> Result<Formula, FormulaError> {
    parse_json(content).or_else(|_| parse_toml(content))
}

/// Load a formula from a file path (auto-detect TOML vs JSON by extension).
pub fn load_formula(path: &Path) -> Result<Formula, FormulaError> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&content),
        Some("json") => parse_json(&content),
        _ => parse_any(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluate;
    use crate::types::{FieldMap, Term};
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_json_bare_array() {
        let json = r#"[{"type": "number", "operationName": "5"}]"#;
        let f = parse_json(json).unwrap();
        assert_eq!(f, Formula::new(vec![Term::number("5")]));
    }

    #[test]
    fn parse_json_wrapped() {
        let json = r#"{"formula": [
            {"type": "customField", "fieldName": "a"},
            {"type": "operation", "operationName": "+"},
            {"type": "customField", "fieldName": "b"}
        ]}"#;
        let f = parse_json(json).unwrap();
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn parse_json_rejects_scalars() {
        assert!(parse_json("42").is_err());
        assert!(parse_json(r#"{"terms": []}"#).is_err());
    }

    #[test]
    fn parse_toml_table_array() {
        let toml_str = r#"
[[formula]]
type = "number"
operationName = "4"

[[formula]]
type = "operation"
operationName = "*"

[[formula]]
type = "customField"
fieldName = "tickets"
"#;
        let f = parse_toml(toml_str).unwrap();
        let fields: FieldMap = [("tickets".to_string(), serde_json::json!(3))].into();
        assert_eq!(evaluate(&f, &fields), 12.0);
    }

    #[test]
    fn load_formula_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("total.json");
        std::fs::write(&path, r#"[{"type": "number", "operationName": "7"}]"#).unwrap();
        let f = load_formula(&path).unwrap();
        assert_eq!(evaluate(&f, &FieldMap::new()), 7.0);
    }

    #[test]
    fn load_formula_missing_file() {
        let err = load_formula(Path::new("/nonexistent/total.json")).unwrap_err();
        assert!(matches!(err, FormulaError::Io(_)));
    }
}
