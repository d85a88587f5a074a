//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what every command handler needs: the
//! resolved `.regform` directory, the loaded configuration, and the global
//! output flags.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use regform_config::config::{RegformConfig, load_config};
use regform_config::regform_dir::{REGFORM_DIR_NAME, find_regform_dir};
use regform_core::event::{EventForm, find_event, load_event};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Resolved `.regform` directory, if any.
    pub regform_dir: Option<PathBuf>,

    /// Configuration loaded from `<regform_dir>/config.yaml` (defaults otherwise).
    pub config: RegformConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// The `--dir` flag wins over discovery. `--json` or `json: true` in the
    /// configuration enables JSON output.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let regform_dir = match global.dir.as_deref() {
            Some(dir) => Some(PathBuf::from(dir)),
            None => env::current_dir().ok().and_then(|cwd| find_regform_dir(&cwd)),
        };

        let config = match regform_dir.as_deref() {
            Some(dir) => load_config(dir)
                .with_context(|| format!("failed to load configuration from {}", dir.display()))?,
            None => RegformConfig::default(),
        };

        Ok(Self {
            json: global.json || config.json,
            regform_dir,
            config,
            verbose: global.verbose,
            quiet: global.quiet,
        })
    }

    /// The `.regform` directory to write to: the resolved one, or a new one
    /// in the current directory.
    pub fn regform_dir_for_write(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.regform_dir {
            return Ok(dir.clone());
        }
        Ok(env::current_dir()?.join(REGFORM_DIR_NAME))
    }

    /// Directories searched for event forms after the working directory.
    pub fn event_search_dirs(&self) -> Vec<PathBuf> {
        self.regform_dir
            .iter()
            .map(|dir| dir.join(&self.config.events_dir))
            .collect()
    }

    /// Find and load an event form by name or path.
    pub fn load_event(&self, name: &str) -> Result<EventForm> {
        let cwd = env::current_dir()?;
        let path = find_event(name, &cwd, &self.event_search_dirs())?;
        let form = load_event(&path)
            .with_context(|| format!("failed to load event form {}", path.display()))?;
        Ok(form)
    }
}
