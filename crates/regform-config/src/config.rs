//! Configuration types and loading for the regform tool.
//!
//! The main entry point is [`RegformConfig`], which represents the contents
//! of `.regform/config.yaml`. Configuration is loaded with [`load_config`]
//! and saved with [`save_config`]. Individual keys are addressed with dotted
//! names (`display.precision`) by [`RegformConfig::get_key`] and
//! [`RegformConfig::set_key`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The key is not a known configuration key.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// How computed amounts are printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Currency symbol prefixed to amounts.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Digits after the decimal point.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            precision: default_precision(),
        }
    }
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_precision() -> u32 {
    2
}

/// Largest accepted `display.precision`.
pub const MAX_PRECISION: u32 = 10;

/// Lint behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LintConfig {
    /// Treat warnings as errors.
    #[serde(default)]
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full regform configuration, corresponding to `.regform/config.yaml`.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// will be deserialized correctly with sensible default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegformConfig {
    /// Output JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,

    /// Directory (relative to `.regform/`) holding event form files.
    #[serde(default = "default_events_dir", rename = "events-dir")]
    pub events_dir: String,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub lint: LintConfig,
}

impl Default for RegformConfig {
    fn default() -> Self {
        Self {
            json: false,
            events_dir: default_events_dir(),
            display: DisplayConfig::default(),
            lint: LintConfig::default(),
        }
    }
}

fn default_events_dir() -> String {
    "events".to_string()
}

/// Every key accepted by [`RegformConfig::get_key`] / [`RegformConfig::set_key`].
pub const KEYS: &[&str] = &[
    "json",
    "events-dir",
    "display.currency",
    "display.precision",
    "lint.strict",
];

impl RegformConfig {
    /// Read a key as a string.
    pub fn get_key(&self, key: &str) -> Result<String> {
        let value = match key {
            "json" => self.json.to_string(),
            "events-dir" => self.events_dir.clone(),
            "display.currency" => self.display.currency.clone(),
            "display.precision" => self.display.precision.to_string(),
            "lint.strict" => self.lint.strict.to_string(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Set a key from its string form.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "json" => self.json = parse_bool(key, value)?,
            "events-dir" => {
                if value.trim().is_empty() {
                    return Err(invalid(key, "must not be empty"));
                }
                self.events_dir = value.to_string();
            }
            "display.currency" => self.display.currency = value.to_string(),
            "display.precision" => {
                let precision: u32 = value
                    .parse()
                    .map_err(|_| invalid(key, "expected a non-negative integer"))?;
                if precision > MAX_PRECISION {
                    return Err(precision_too_large());
                }
                self.display.precision = precision;
            }
            "lint.strict" => self.lint.strict = parse_bool(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Restore a key to its default value.
    pub fn unset_key(&mut self, key: &str) -> Result<()> {
        let defaults = Self::default();
        let value = defaults.get_key(key)?;
        self.set_key(key, &value)
    }

    /// Check values that the YAML types alone do not bound.
    pub fn check(&self) -> Result<()> {
        if self.display.precision > MAX_PRECISION {
            return Err(precision_too_large());
        }
        Ok(())
    }

    /// Format an amount with the configured currency and precision.
    ///
    /// Precision is capped at [`MAX_PRECISION`] even if the struct was built
    /// without [`RegformConfig::check`].
    pub fn format_amount(&self, amount: f64) -> String {
        let precision = self.display.precision.min(MAX_PRECISION) as usize;
        if amount < 0.0 {
            format!("-{}{:.*}", self.display.currency, precision, -amount)
        } else {
            format!("{}{:.*}", self.display.currency, precision, amount)
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, "expected true or false")),
    }
}

fn precision_too_large() -> ConfigError {
    invalid(
        "display.precision",
        &format!("must be {MAX_PRECISION} or less"),
    )
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `config.yaml` inside the given `.regform/` directory.
///
/// If the file does not exist, a default [`RegformConfig`] is returned.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// or [`ConfigError::ParseError`] if it contains invalid YAML.
pub fn load_config(regform_dir: &Path) -> Result<RegformConfig> {
    let config_path = regform_dir.join("config.yaml");

    if !config_path.exists() {
        return Ok(RegformConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;

    // An empty file is valid and yields default config.
    if content.trim().is_empty() {
        return Ok(RegformConfig::default());
    }

    let config: RegformConfig = serde_yaml::from_str(&content)?;
    config.check()?;
    Ok(config)
}

/// Save configuration to `config.yaml` inside the given `.regform/` directory.
///
/// The directory is created if it does not exist.
pub fn save_config(regform_dir: &Path, config: &RegformConfig) -> Result<()> {
    std::fs::create_dir_all(regform_dir)?;

    let config_path = regform_dir.join("config.yaml");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let cfg = RegformConfig::default();
        assert!(!cfg.json);
        assert_eq!(cfg.events_dir, "events");
        assert_eq!(cfg.display.currency, "$");
        assert_eq!(cfg.display.precision, 2);
        assert!(!cfg.lint.strict);
    }

    #[test]
    fn test_load_missing_config_returns_default() {
        let dir = PathBuf::from("/nonexistent/path/.regform");
        let cfg = load_config(&dir).unwrap();
        assert_eq!(cfg, RegformConfig::default());
    }

    #[test]
    fn test_roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();
        let regform_dir = dir.path().join(".regform");

        let mut cfg = RegformConfig::default();
        cfg.display.currency = "EUR ".to_string();
        cfg.lint.strict = true;

        save_config(&regform_dir, &cfg).unwrap();
        let loaded = load_config(&regform_dir).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = "events-dir: forms\ndisplay:\n  precision: 0\n";
        let cfg: RegformConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.events_dir, "forms");
        assert_eq!(cfg.display.precision, 0);
        // Everything else should be default
        assert_eq!(cfg.display.currency, "$");
        assert!(!cfg.json);
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut cfg = RegformConfig::default();
        cfg.set_key("display.precision", "3").unwrap();
        cfg.set_key("lint.strict", "yes").unwrap();
        assert_eq!(cfg.get_key("display.precision").unwrap(), "3");
        assert_eq!(cfg.get_key("lint.strict").unwrap(), "true");

        cfg.unset_key("display.precision").unwrap();
        assert_eq!(cfg.display.precision, 2);

        for key in KEYS {
            assert!(cfg.get_key(key).is_ok(), "{key} should be readable");
        }
    }

    #[test]
    fn test_load_rejects_oversized_precision() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.yaml"),
            "display:\n  precision: 4000000000\n",
        )
        .unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "display.precision"));
    }

    #[test]
    fn test_format_amount_caps_precision() {
        let mut cfg = RegformConfig::default();
        cfg.display.precision = u32::MAX;
        assert_eq!(cfg.format_amount(1.0), "$1.0000000000");
        assert!(matches!(
            cfg.set_key("display.precision", "11"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut cfg = RegformConfig::default();
        assert!(matches!(
            cfg.set_key("display.precision", "-1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_key("json", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_key("colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_format_amount() {
        let mut cfg = RegformConfig::default();
        assert_eq!(cfg.format_amount(12.5), "$12.50");
        assert_eq!(cfg.format_amount(-3.0), "-$3.00");
        cfg.display.precision = 0;
        assert_eq!(cfg.format_amount(99.6), "$100");
    }
}
