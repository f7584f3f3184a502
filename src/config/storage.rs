//! Loading policy configuration from disk.

use super::PolicyConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filename for the policy config.
pub const CONFIG_FILE: &str = "review-gate.toml";

/// Directory name under the user config dir.
const APP_DIR: &str = "review-gate";

/// Candidate config paths, in lookup order.
///
/// 1. `<dir>/.github/review-gate.toml`
/// 2. `<dir>/review-gate.toml`
/// 3. `<user config dir>/review-gate/config.toml`
pub fn config_candidates(dir: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![
        dir.join(".github").join(CONFIG_FILE),
        dir.join(CONFIG_FILE),
    ];
    if let Some(user_dir) = dirs::config_dir() {
        candidates.push(user_dir.join(APP_DIR).join("config.toml"));
    }
    candidates
}

/// First existing config file for `dir`, if any.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    config_candidates(dir).into_iter().find(|p| p.is_file())
}

/// Load a policy config from `path`.
///
/// Unlike discovery, an explicit path that doesn't exist is an error.
pub fn load_config(path: &Path) -> Result<PolicyConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: PolicyConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    debug!(path = %path.display(), "loaded policy config");
    Ok(config)
}
