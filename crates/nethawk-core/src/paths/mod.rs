//! Path utilities for nethawk's bundled resources and writable state.
//!
//! This module provides the canonical path resolution for the wrapper:
//! - Deployment mode detection (source checkout vs. compiled binaries)
//! - Bundled code/data roots
//! - Writable state root and its layout
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle presentation separately
//! - Detection specifics are kept private in `platform`

mod config;
mod ensure;
mod error;
mod platform;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export public API

// Error type
pub use error::PathError;

// Deployment detection
pub use platform::{BUNDLE_DIR_ENV, DeploymentMode, Detection, FROZEN_ENV, PACKAGE_DIR, detect};

// Resolver state and diagnostics snapshot
pub use resolver::{ResolvedPaths, Resources};

// Writable-state layout and environment overrides
pub use config::{
    CONFIG_FILE, CONFIG_ROOT_ENV, STATE_DIR_ENV, config_path, config_root, export_state_dir,
    tmp_dir, workspaces_dir,
};

// Directory operations
pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};
