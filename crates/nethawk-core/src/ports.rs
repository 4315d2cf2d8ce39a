//! Ports consumed by and provided to the wrapped tool.
//!
//! Core defines the traits; adapters implement them. The wrapped tool is
//! opaque to the wrapper: everything it does is reached through
//! [`ToolEntryPoint`], and everything it needs from the bundle comes in
//! through [`BundlePaths`] injected at construction time.

use std::path::PathBuf;

/// Outcome of the wrapped tool's entry point.
///
/// This is the explicit result-type rendition of "exit as control flow":
/// instead of a language-level non-local exit, the entry point returns the
/// exit it wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolExit {
    /// Normal completion carrying an exit code.
    Code(i32),
    /// Exit request carrying a message instead of a code.
    ///
    /// `None` maps to success (0), `Some(_)` to failure (1); the message is
    /// appended to captured stderr.
    Message(Option<String>),
}

/// The wrapped tool's single programmatic entry point.
///
/// Implementations read the process-wide argument vector through
/// [`crate::harness::capture::argv`] and perform all terminal I/O through the
/// capture slots, exactly like a standalone binary would use its real argv
/// and standard streams.
pub trait ToolEntryPoint: Send + Sync {
    fn run(&self) -> ToolExit;
}

/// Path-provider capability handed to the wrapped tool's loaders.
///
/// Loaders accept this at construction instead of having their internals
/// rewritten after the fact, which keeps the wrapper's resolved paths the
/// single source of truth.
pub trait BundlePaths: Send + Sync {
    /// Bundled code root.
    fn code_root(&self) -> PathBuf;
    /// Bundled data root.
    fn data_root(&self) -> PathBuf;
    /// Resolve a bundled sub-resource relative to the code root.
    fn resolve(&self, relative: &str) -> PathBuf;
}
