//! Core bootstrap machinery for the nethawk wrapper.
//!
//! This crate owns everything the compiled wrapper needs before the wrapped
//! tool runs: deployment-mode detection, resource path resolution, the
//! in-process invocation harness with output capture, and the self-test
//! battery that validates a packaged binary end to end.
//!
//! No terminal presentation lives here; the CLI crate renders reports and
//! decides process exit codes.

pub mod harness;
pub mod paths;
pub mod ports;
pub mod selftest;

pub use harness::{Harness, HarnessError, InvocationResult, TOOL_NAME};
pub use paths::{DeploymentMode, PathError, ResolvedPaths, Resources};
pub use ports::{BundlePaths, ToolEntryPoint, ToolExit};
pub use selftest::{CheckResult, CheckStatus, SelfTestRunner, SuiteReport};
