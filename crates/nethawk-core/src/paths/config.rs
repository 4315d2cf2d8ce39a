//! Writable-state layout and environment overrides.
//!
//! The writable state root holds everything nethawk is allowed to create at
//! runtime: a `tmp/` scratch directory, a `workspaces/` directory and the
//! runtime copy of `nethawk.conf`. None of it is pre-populated here; each
//! location is created on first use.

use std::env;
use std::path::PathBuf;

use super::ensure::{DirectoryCreationStrategy, ensure_directory};
use super::error::PathError;
use super::resolver::Resources;

/// Override for the root configuration directory (takes precedence over the
/// computed `~/.nethawk` default).
pub const CONFIG_ROOT_ENV: &str = "NETHAWK_PATH";

/// Writable-state/database directory override. Exported by the bootstrap
/// step when absent so downstream code reads a consistent value.
pub const STATE_DIR_ENV: &str = "NETHAWK_DB";

/// Name of the runtime configuration file at the state root.
pub const CONFIG_FILE: &str = "nethawk.conf";

/// The per-user configuration root.
///
/// `NETHAWK_PATH` wins when set; otherwise a fixed hidden directory under
/// the user's home.
pub fn config_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(CONFIG_ROOT_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".nethawk"))
        .ok_or(PathError::NoHomeDir)
}

/// `tmp/` scratch directory under the writable state root, created on first use.
pub fn tmp_dir(resources: &Resources) -> Result<PathBuf, PathError> {
    let dir = resources.writable_state_root()?.join("tmp");
    ensure_directory(&dir, DirectoryCreationStrategy::AutoCreate)?;
    Ok(dir)
}

/// `workspaces/` directory under the writable state root, created on first use.
pub fn workspaces_dir(resources: &Resources) -> Result<PathBuf, PathError> {
    let dir = resources.writable_state_root()?.join("workspaces");
    ensure_directory(&dir, DirectoryCreationStrategy::AutoCreate)?;
    Ok(dir)
}

/// Location of the runtime configuration file.
///
/// The file itself is created on first use by the tool's config loader, not
/// here.
pub fn config_path(resources: &Resources) -> Result<PathBuf, PathError> {
    Ok(resources.writable_state_root()?.join(CONFIG_FILE))
}

/// Export the resolved writable-state root through `NETHAWK_DB` unless the
/// user already set it.
///
/// Returns the value downstream code will observe.
pub fn export_state_dir(resources: &Resources) -> Result<PathBuf, PathError> {
    if let Ok(existing) = env::var(STATE_DIR_ENV) {
        if !existing.trim().is_empty() {
            return Ok(PathBuf::from(existing));
        }
    }

    let state_root = resources.writable_state_root()?;
    // Bootstrap runs before any worker threads exist, which is what makes
    // mutating the process environment sound here.
    #[allow(unsafe_code)]
    unsafe {
        env::set_var(STATE_DIR_ENV, &state_root);
    }
    Ok(state_root)
}
