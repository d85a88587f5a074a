//! Discovery of the `.regform/` directory.
//!
//! The `.regform/` directory holds `config.yaml` and, by default, an
//! `events/` directory of event form files. It is found by walking up the
//! directory tree from the working directory.

use std::path::{Path, PathBuf};

/// The name of the regform metadata directory.
pub const REGFORM_DIR_NAME: &str = ".regform";

/// The name of the environment variable that can override the directory.
const REGFORM_DIR_ENV: &str = "REGFORM_DIR";

/// Walk up the directory tree from `start` looking for a `.regform/` directory.
///
/// The `REGFORM_DIR` environment variable is checked first (highest
/// priority). Returns `None` if the filesystem root is reached without
/// finding one.
///
/// # Examples
///
/// ```no_run
/// use regform_config::regform_dir::find_regform_dir;
/// use std::path::Path;
///
/// if let Some(dir) = find_regform_dir(Path::new(".")) {
///     println!("Found regform dir at {}", dir.display());
/// }
/// ```
pub fn find_regform_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(REGFORM_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }
    walk_up(start)
}

fn walk_up(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(REGFORM_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}
