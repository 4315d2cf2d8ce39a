//! Invocation harness for the wrapped tool.
//!
//! Calls the tool's entry point in-process with the global output slots
//! swapped for capture buffers and the argument vector replaced, then
//! normalizes whatever happened (return, exit request, panic) into an
//! [`InvocationResult`]. Tool-originated faults never escape `invoke`;
//! only harness-internal breakage does.

pub mod capture;

use std::backtrace::Backtrace;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;

use crate::ports::{ToolEntryPoint, ToolExit};
use capture::RedirectGuard;

/// Name the wrapped tool sees as `argv[0]`.
pub const TOOL_NAME: &str = "nethawk";

/// Structured result of one harness invocation.
///
/// Produced once per call, immutable, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Harness-internal failures.
///
/// These indicate the bootstrap machinery itself is broken and are expected
/// to be unrecoverable, unlike tool faults which are captured into the
/// result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarnessError {
    /// `invoke` was re-entered while a call was already in flight on this
    /// thread. The global slots cannot be nested per-invocation.
    #[error("an invocation is already in flight on this thread")]
    InvocationInFlight,
}

// Cross-thread exclusion: two simultaneous invocations would race on the
// process-wide slots and could restore the wrong prior state.
static GATE: Mutex<()> = Mutex::new(());

thread_local! {
    static IN_FLIGHT: Cell<bool> = const { Cell::new(false) };
}

struct InFlightReset;

impl Drop for InFlightReset {
    fn drop(&mut self) {
        IN_FLIGHT.set(false);
    }
}

/// Drives the wrapped tool's entry point with output capture.
pub struct Harness {
    entry: Arc<dyn ToolEntryPoint>,
}

impl Harness {
    pub fn new(entry: Arc<dyn ToolEntryPoint>) -> Self {
        Self { entry }
    }

    /// Invoke the wrapped tool with the given arguments.
    ///
    /// The tool sees `[nethawk, ..args]` as its argument vector and the
    /// capture buffers as its standard streams. On every exit path the
    /// previous stream bindings and argument vector are restored exactly
    /// once before this returns.
    pub fn invoke(&self, args: &[String]) -> Result<InvocationResult, HarnessError> {
        if IN_FLIGHT.get() {
            return Err(HarnessError::InvocationInFlight);
        }
        let _gate = GATE.lock().unwrap_or_else(PoisonError::into_inner);
        IN_FLIGHT.set(true);
        let _reset = InFlightReset;

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(TOOL_NAME.to_string());
        argv.extend_from_slice(args);

        let (guard, out_buf, err_buf) = RedirectGuard::install(argv);

        // Silence the default panic hook for the duration of the call so a
        // tool fault lands in the capture buffer, not on the real stderr.
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.entry.run()));
        panic::set_hook(prev_hook);

        let returncode = match outcome {
            Ok(ToolExit::Code(code)) => code,
            Ok(ToolExit::Message(None)) => 0,
            Ok(ToolExit::Message(Some(message))) => {
                err_buf.append(&format!("{message}\n"));
                1
            }
            Err(payload) => {
                let description = panic_message(payload.as_ref());
                let trace = Backtrace::force_capture();
                err_buf.append(&format!("\nException: {description}\n{trace}\n"));
                1
            }
        };

        // Restore stream bindings and argv before the buffers are read out.
        drop(guard);

        Ok(InvocationResult {
            returncode,
            stdout: out_buf.contents(),
            stderr: err_buf.contents(),
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
