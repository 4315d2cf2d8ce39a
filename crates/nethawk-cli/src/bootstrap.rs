//! Wrapper bootstrap - the composition root.
//!
//! This is the ONLY place where the wrapper wires infrastructure together:
//! deployment detection, the exported writable-state directory and the tool
//! entry point behind the invocation harness. Everything downstream receives
//! the composed [`WrapperContext`].

use std::sync::Arc;

use anyhow::Result;

use nethawk_core::harness::Harness;
use nethawk_core::paths::{self, Resources};
use nethawk_core::ports::ToolEntryPoint;
use nethawk_tool::NethawkTool;

/// Fully composed wrapper context.
pub struct WrapperContext {
    /// Resolved resource locations for this process.
    pub resources: Resources,
    /// Harness driving the bundled tool.
    pub harness: Harness,
}

/// Bootstrap the wrapper.
///
/// 1. Takes the process-wide resource singleton (detection runs at most once)
/// 2. Exports the writable-state directory for downstream code
/// 3. Constructs the bundled tool with injected bundle paths
/// 4. Wraps it in the invocation harness
pub fn bootstrap() -> Result<WrapperContext> {
    let resources = Resources::global().clone();
    tracing::debug!(
        mode = ?resources.mode(),
        base = %resources.base().display(),
        "deployment detected"
    );

    let state_root = paths::export_state_dir(&resources)?;
    tracing::debug!(state = %state_root.display(), "writable state exported");

    let config_path = paths::config_path(&resources)?;
    let entry: Arc<dyn ToolEntryPoint> =
        Arc::new(NethawkTool::new(Arc::new(resources.clone()), config_path));

    Ok(WrapperContext {
        resources,
        harness: Harness::new(entry),
    })
}

/// Bootstrap with explicit resources and entry point (for testing).
pub fn bootstrap_with(resources: Resources, entry: Arc<dyn ToolEntryPoint>) -> WrapperContext {
    WrapperContext {
        resources,
        harness: Harness::new(entry),
    }
}
