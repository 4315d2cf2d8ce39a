//! Resource resolution for the three deployment modes.
//!
//! `Resources` is built exactly once from a [`Detection`] and then only read.
//! It is threaded explicitly through consumers (composition-root style); the
//! [`Resources::global`] accessor exists for the process-wide singleton the
//! wrapper binary uses, with `OnceLock` guaranteeing race-free one-time
//! construction.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Serialize;

use super::config;
use super::ensure::{DirectoryCreationStrategy, ensure_directory};
use super::error::PathError;
use super::platform::{self, DeploymentMode, Detection, PACKAGE_DIR};
use crate::ports::BundlePaths;

/// Role-tagged resource locations for the current process.
///
/// The code and data roots are read-only and bundled at packaging time; the
/// writable state root is created on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    mode: DeploymentMode,
    base: PathBuf,
}

static GLOBAL: OnceLock<Resources> = OnceLock::new();

impl Resources {
    /// Run deployment detection and build the resolver state from it.
    pub fn detect() -> Self {
        Self::from_detection(platform::detect())
    }

    /// Build resolver state from an explicit detection (test seam).
    pub fn from_detection(detection: Detection) -> Self {
        Self {
            mode: detection.mode,
            base: detection.base,
        }
    }

    /// The process-wide resolver singleton.
    ///
    /// Constructed exactly once, even under concurrent first access; every
    /// call returns the same instance and detection never re-runs.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::detect)
    }

    /// The deployment mode this process runs under.
    pub const fn mode(&self) -> DeploymentMode {
        self.mode
    }

    /// The base directory implied by the deployment mode.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Location of the bundled code: `base/nethawk`.
    pub fn code_root(&self) -> PathBuf {
        self.base.join(PACKAGE_DIR)
    }

    /// Location of the bundled data: `code_root/data`.
    pub fn data_root(&self) -> PathBuf {
        self.code_root().join("data")
    }

    /// The writable state root, created (with parents) on demand.
    ///
    /// Compiled binaries often live in read-only install locations, so frozen
    /// modes write under the user's configuration root instead of next to the
    /// bundle. A source checkout keeps its state in a `workspace/` directory
    /// under the base.
    pub fn writable_state_root(&self) -> Result<PathBuf, PathError> {
        let root = if self.mode == DeploymentMode::SourceCheckout {
            self.base.join("workspace")
        } else {
            config::config_root()?
        };
        ensure_directory(&root, DirectoryCreationStrategy::AutoCreate)?;
        Ok(root)
    }

    /// Resolve an arbitrary bundled sub-resource relative to the code root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.code_root().join(relative)
    }
}

impl BundlePaths for Resources {
    fn code_root(&self) -> PathBuf {
        Self::code_root(self)
    }

    fn data_root(&self) -> PathBuf {
        Self::data_root(self)
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        Self::resolve(self, relative)
    }
}

/// All resolved paths captured in a single struct.
///
/// This is the "golden truth" snapshot for path-independence diagnostics:
/// the self-test battery and humans debugging packaging both read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    /// Detected deployment mode.
    pub mode: DeploymentMode,
    /// Base directory implied by the mode.
    pub base: PathBuf,
    /// Bundled code root.
    pub code_root: PathBuf,
    /// Bundled data root.
    pub data_root: PathBuf,
    /// Writable state root (created by the capture call).
    pub state_root: PathBuf,
    /// Runtime configuration file location.
    pub config_path: PathBuf,
}

impl ResolvedPaths {
    /// Capture every resolved path once, for consistent diagnostics.
    pub fn capture(resources: &Resources) -> Result<Self, PathError> {
        Ok(Self {
            mode: resources.mode(),
            base: resources.base().to_path_buf(),
            code_root: resources.code_root(),
            data_root: resources.data_root(),
            state_root: resources.writable_state_root()?,
            config_path: config::config_path(resources)?,
        })
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "mode = {:?}", self.mode)?;
        writeln!(f, "base = {}", self.base.display())?;
        writeln!(f, "code_root = {}", self.code_root.display())?;
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "state_root = {}", self.state_root.display())?;
        write!(f, "config_path = {}", self.config_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ensure::verify_writable;
    use crate::paths::test_utils::ENV_LOCK;
    use tempfile::tempdir;

    fn resources(mode: DeploymentMode, base: &Path) -> Resources {
        Resources::from_detection(Detection {
            mode,
            base: base.to_path_buf(),
        })
    }

    #[test]
    fn global_is_reference_identical_across_calls() {
        let _guard = ENV_LOCK.lock().unwrap();

        let first = Resources::global();
        let second = Resources::global();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, second);
    }

    #[test]
    fn checkout_state_root_lives_under_base_and_is_writable() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let res = resources(DeploymentMode::SourceCheckout, temp.path());

        let state = res.writable_state_root().unwrap();
        assert_eq!(state, temp.path().join("workspace"));
        assert!(state.is_dir());
        verify_writable(&state).unwrap();
    }

    #[test]
    fn frozen_state_root_lives_under_config_root() {
        use crate::paths::config::CONFIG_ROOT_ENV;
        use crate::paths::test_utils::EnvVarGuard;

        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let config_dir = temp.path().join("confroot");
        let _env = EnvVarGuard::set(CONFIG_ROOT_ENV, config_dir.to_string_lossy().as_ref());

        for mode in [DeploymentMode::FrozenOneFile, DeploymentMode::FrozenStandalone] {
            let res = resources(mode, &temp.path().join("install"));
            let state = res.writable_state_root().unwrap();
            assert_eq!(state, config_dir);
            assert!(state.is_dir());
            verify_writable(&state).unwrap();
        }
    }

    #[test]
    fn one_file_data_root_resolves_under_extraction_dir() {
        let temp = tempdir().unwrap();
        let extraction = temp.path().join("extract");
        let res = resources(DeploymentMode::FrozenOneFile, &extraction);

        assert_eq!(res.data_root(), extraction.join(PACKAGE_DIR).join("data"));
        assert!(!res.data_root().starts_with(std::env::current_exe().unwrap().parent().unwrap()));
    }

    #[test]
    fn resolve_joins_relative_paths_onto_code_root() {
        let temp = tempdir().unwrap();
        let res = resources(DeploymentMode::SourceCheckout, temp.path());

        assert_eq!(
            res.resolve("data/protocols.json"),
            temp.path().join(PACKAGE_DIR).join("data/protocols.json")
        );
    }

    #[test]
    fn capture_is_deterministic_and_display_is_parseable() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let res = resources(DeploymentMode::SourceCheckout, temp.path());

        let first = ResolvedPaths::capture(&res).unwrap();
        let second = ResolvedPaths::capture(&res).unwrap();
        assert_eq!(first, second);

        let output = first.to_string();
        assert!(output.contains("mode = "));
        assert!(output.contains("base = "));
        assert!(output.contains("code_root = "));
        assert!(output.contains("data_root = "));
        assert!(output.contains("state_root = "));
        assert!(output.contains("config_path = "));
    }
}
