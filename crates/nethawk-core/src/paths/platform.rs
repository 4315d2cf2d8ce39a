//! Deployment mode detection.
//!
//! Classifies the running process as one of three packaging shapes and
//! derives the base directory the bundled resources hang off. The priority
//! order is load-bearing: a one-file binary unpacks its bundle to a scratch
//! directory, a standalone binary sits next to its support files, and a
//! source checkout keeps them in the repo the binary was built from.

use std::env;
use std::path::PathBuf;

use serde::Serialize;

/// Marker stamped by the packager on compiled (frozen) builds.
pub const FROZEN_ENV: &str = "NETHAWK_FROZEN";

/// Extraction directory exported by the one-file launcher stub.
pub const BUNDLE_DIR_ENV: &str = "NETHAWK_BUNDLE_DIR";

/// Name of the bundled-code directory under the base path.
pub const PACKAGE_DIR: &str = "nethawk";

/// The packaging shape the process is currently running under.
///
/// Determined once per process and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeploymentMode {
    /// Running from a source tree (or a degraded best-effort equivalent).
    SourceCheckout,
    /// Single-file compiled binary that unpacked its bundle to a scratch dir.
    FrozenOneFile,
    /// Directory-based compiled binary sitting next to its support files.
    FrozenStandalone,
}

/// Result of deployment detection: the mode plus the base directory it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub mode: DeploymentMode,
    pub base: PathBuf,
}

/// Detect the current deployment mode and base directory.
///
/// Never fails: ambiguous environments degrade to a warned best-effort
/// `SourceCheckout` so callers surface "resource not found" later instead of
/// crashing here.
pub fn detect() -> Detection {
    let frozen = frozen_marker();

    if frozen {
        if let Some(bundle_dir) = extraction_dir() {
            return Detection {
                mode: DeploymentMode::FrozenOneFile,
                base: bundle_dir,
            };
        }
        return Detection {
            mode: DeploymentMode::FrozenStandalone,
            base: executable_dir(),
        };
    }

    // Not frozen: resolve the installed package via the build-time repo root,
    // the analog of asking the language runtime where the package lives.
    if let Some(repo_root) = locate_repo_root() {
        return Detection {
            mode: DeploymentMode::SourceCheckout,
            base: repo_root,
        };
    }

    // Fallback: the directory containing the running executable. If the
    // bundled-code subdirectory is there we are effectively a checkout;
    // otherwise warn and use it anyway (degraded mode).
    let exe_dir = executable_dir();
    if !exe_dir.join(PACKAGE_DIR).is_dir() {
        tracing::warn!(
            base = %exe_dir.display(),
            "could not locate the {PACKAGE_DIR} bundle; resource lookups may fail"
        );
    }
    Detection {
        mode: DeploymentMode::SourceCheckout,
        base: exe_dir,
    }
}

fn frozen_marker() -> bool {
    env::var(FROZEN_ENV).is_ok_and(|v| {
        let v = v.trim();
        !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false")
    })
}

fn extraction_dir() -> Option<PathBuf> {
    env::var(BUNDLE_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Directory containing the running executable, falling back to the current
/// working directory when the executable location cannot be determined.
fn executable_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| {
            tracing::warn!("cannot determine executable location; using current directory");
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
}

/// Locate the source repository this binary was built from, if we are still
/// running inside it.
///
/// Returns `None` when the baked-in path no longer holds a nethawk package,
/// e.g. the binary was copied to another machine.
#[allow(clippy::unnecessary_wraps)] // Option is needed for release builds
fn locate_repo_root() -> Option<PathBuf> {
    let repo_root = PathBuf::from(env!("NETHAWK_REPO_ROOT"));

    #[cfg(debug_assertions)]
    {
        // In debug mode, always trust the repo we are building from as long
        // as the package directory is actually there.
        if repo_root.join(PACKAGE_DIR).is_dir() {
            Some(repo_root)
        } else {
            None
        }
    }

    #[cfg(not(debug_assertions))]
    {
        // In release mode, check if this binary was built from a local repo.
        if !repo_root.join(PACKAGE_DIR).is_dir() {
            return None;
        }

        // Strategy 1: Check the marker file created by build.rs
        let marker_file = repo_root
            .join(PACKAGE_DIR)
            .join("data")
            .join(".nethawk_repo_path");
        if marker_file.exists() {
            if let Ok(contents) = std::fs::read_to_string(&marker_file) {
                if contents.trim() == repo_root.to_string_lossy() {
                    return Some(repo_root);
                }
            }
        }

        // Strategy 2 (fallback): Check if the executable is inside the repo
        if let Ok(exe_path) = env::current_exe() {
            if let Ok(canonical_exe) = exe_path.canonicalize() {
                if let Ok(canonical_repo) = repo_root.canonicalize() {
                    if canonical_exe.starts_with(&canonical_repo) {
                        return Some(repo_root);
                    }
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn frozen_with_bundle_dir_is_one_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _frozen = EnvVarGuard::set(FROZEN_ENV, "1");
        let _bundle = EnvVarGuard::set(BUNDLE_DIR_ENV, "/tmp/nethawk_extract");

        let detection = detect();
        assert_eq!(detection.mode, DeploymentMode::FrozenOneFile);
        assert_eq!(detection.base, PathBuf::from("/tmp/nethawk_extract"));
    }

    #[test]
    fn frozen_without_bundle_dir_is_standalone_next_to_exe() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _frozen = EnvVarGuard::set(FROZEN_ENV, "true");
        let _bundle = EnvVarGuard::unset(BUNDLE_DIR_ENV);

        let detection = detect();
        assert_eq!(detection.mode, DeploymentMode::FrozenStandalone);

        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(detection.base, exe_dir);
    }

    #[test]
    fn empty_or_zero_frozen_marker_is_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _frozen = EnvVarGuard::set(FROZEN_ENV, "0");
        let _bundle = EnvVarGuard::unset(BUNDLE_DIR_ENV);

        let detection = detect();
        assert_eq!(detection.mode, DeploymentMode::SourceCheckout);
    }

    #[test]
    fn unfrozen_resolves_repo_root_away_from_cwd() {
        // The scenario behind this: copy nothing but the wrapper binary into
        // an empty directory and run it - detection must still find the
        // package where it is installed, not in the empty cwd.
        let _guard = ENV_LOCK.lock().unwrap();
        let _frozen = EnvVarGuard::unset(FROZEN_ENV);
        let _bundle = EnvVarGuard::unset(BUNDLE_DIR_ENV);

        let detection = detect();
        assert_eq!(detection.mode, DeploymentMode::SourceCheckout);
        // Test binaries run from the repo, so the baked-in root must win.
        assert_eq!(detection.base, PathBuf::from(env!("NETHAWK_REPO_ROOT")));
        assert!(detection.base.join(PACKAGE_DIR).is_dir());
    }
}
