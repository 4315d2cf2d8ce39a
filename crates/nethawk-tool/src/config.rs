//! Runtime configuration bootstrap.
//!
//! The bundled `nethawk.conf` is read-only; the first scan copies it to the
//! writable state directory and all later runs edit and read that copy.

use std::fs;
use std::io;
use std::path::Path;

use nethawk_core::paths::CONFIG_FILE;
use nethawk_core::ports::BundlePaths;

/// Minimal configuration written when the bundle carries no default.
const FALLBACK_CONFIG: &str = "[nethawk]\nworkspace = default\nlog_mode = false\n";

/// Make sure the runtime configuration file exists at `config_path`.
///
/// An existing copy is never touched. Missing parents are created.
pub fn ensure_runtime_config(paths: &dyn BundlePaths, config_path: &Path) -> io::Result<()> {
    if config_path.exists() {
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let bundled = paths.data_root().join(CONFIG_FILE);
    if bundled.exists() {
        fs::copy(&bundled, config_path)?;
        tracing::info!(
            from = %bundled.display(),
            to = %config_path.display(),
            "runtime configuration initialized from bundle"
        );
    } else {
        fs::write(config_path, FALLBACK_CONFIG)?;
        tracing::warn!(
            to = %config_path.display(),
            "bundled configuration missing, wrote fallback defaults"
        );
    }
    Ok(())
}
