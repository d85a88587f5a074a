//! Event registration forms: loading and lookup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::field::RegistrationField;

/// Errors from loading event forms or editing form state.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("event form '{0}' not found")]
    NotFound(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field '{0}' is not user-editable")]
    ReadOnlyField(String),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The registration form configured for one event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    /// Event identifier.
    pub event: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Fields in display order.
    #[serde(default)]
    pub fields: Vec<RegistrationField>,

    /// Where this form was loaded from (set by the loader).
    #[serde(skip)]
    pub source: String,
}

impl EventForm {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&RegistrationField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Dynamic fields in declaration order.
    pub fn dynamic_fields(&self) -> impl Iterator<Item = &RegistrationField> {
        self.fields.iter().filter(|f| f.is_dynamic())
    }

    /// Title for display, falling back to the event identifier.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.event
        } else {
            &self.title
        }
    }
}

/// Parse an event form from a JSON string.
pub fn parse_json(content: &str) -> Result<EventForm, EventError> {
    serde_json::from_str(content).map_err(|e| EventError::Parse(e.to_string()))
}

/// Parse an event form from a TOML string.
pub fn parse_toml(content: &str) -> Result<EventForm, EventError> {
    toml::from_str(content).map_err(|e| EventError::Parse(e.to_string()))
}

/// Load an event form from a file path (auto-detect TOML vs JSON by extension).
pub fn load_event(path: &Path) -> Result<EventForm, EventError> {
    let content = std::fs::read_to_string(path)?;
    let mut form = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&content)?,
        Some("json") => parse_json(&content)?,
        _ => parse_json(&content).or_else(|_| parse_toml(&content))?,
    };
    form.source = path.display().to_string();
    tracing::debug!(event = %form.event, fields = form.fields.len(), source = %form.source, "loaded event form");
    Ok(form)
}

/// Standard suffixes tried when resolving an event by name.
const SUFFIXES: [&str; 4] = [".event.json", ".event.toml", ".json", ".toml"];

/// Search for an event form by name.
///
/// Search order:
/// 1. Exact path (absolute, or relative to `cwd`)
/// 2. `cwd` with standard suffixes
/// 3. Each directory in `search_dirs`, in order
/// 4. `~/.regform/events/`
pub fn find_event(name: &str, cwd: &Path, search_dirs: &[PathBuf]) -> Result<PathBuf, EventError> {
    let exact = Path::new(name);
    if exact.is_absolute() && exact.is_file() {
        return Ok(exact.to_path_buf());
    }
    let relative = cwd.join(name);
    if relative.is_file() {
        return Ok(relative);
    }

    let mut dirs: Vec<PathBuf> = vec![cwd.to_path_buf()];
    dirs.extend(search_dirs.iter().cloned());
    if let Some(home) = home_dir() {
        dirs.push(home.join(".regform").join("events"));
    }

    dirs.iter()
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| SUFFIXES.iter().map(move |s| dir.join(format!("{name}{s}"))))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| EventError::NotFound(name.to_string()))
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
