//! Process-global output-stream slots and argument vector.
//!
//! The wrapped tool performs all terminal I/O through [`stdout`]/[`stderr`]
//! and reads its arguments through [`argv`], exactly like a standalone binary
//! uses its real standard streams and argv. While no redirect is installed,
//! writes fall through to the real streams; the invocation harness swaps in
//! capture buffers for the duration of a call via [`RedirectGuard`].
//!
//! The slots are deliberately process-wide shared state, which is why the
//! harness enforces a single in-flight invocation (see `harness`).

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type SlotValue = Option<Box<dyn Write + Send>>;

static STDOUT_SLOT: Mutex<SlotValue> = Mutex::new(None);
static STDERR_SLOT: Mutex<SlotValue> = Mutex::new(None);
static ARGV_OVERRIDE: Mutex<Option<Vec<String>>> = Mutex::new(None);

// The slot contents are always valid regardless of where a panic landed, so
// a poisoned lock can be safely recovered instead of propagated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle writing to the process's stdout slot.
pub struct ToolStdout;

/// Handle writing to the process's stderr slot.
pub struct ToolStderr;

/// Writer for the tool's standard output.
pub const fn stdout() -> ToolStdout {
    ToolStdout
}

/// Writer for the tool's standard error.
pub const fn stderr() -> ToolStderr {
    ToolStderr
}

impl Write for ToolStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match lock(&STDOUT_SLOT).as_mut() {
            Some(writer) => writer.write(buf),
            None => io::stdout().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match lock(&STDOUT_SLOT).as_mut() {
            Some(writer) => writer.flush(),
            None => io::stdout().flush(),
        }
    }
}

impl Write for ToolStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match lock(&STDERR_SLOT).as_mut() {
            Some(writer) => writer.write(buf),
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match lock(&STDERR_SLOT).as_mut() {
            Some(writer) => writer.flush(),
            None => io::stderr().flush(),
        }
    }
}

/// The process-wide argument vector as the wrapped tool sees it.
///
/// Returns the harness-installed vector during an invocation and the real
/// process arguments otherwise.
pub fn argv() -> Vec<String> {
    lock(&ARGV_OVERRIDE)
        .clone()
        .unwrap_or_else(|| std::env::args().collect())
}

/// An in-memory capture target for one of the output slots.
///
/// Cloning shares the underlying buffer, so the harness can keep a reading
/// handle while the slot owns the writing handle.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Final contents of the buffer, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.inner)).into_owned()
    }

    /// Append text directly, bypassing the slot (used for fault reporting).
    pub fn append(&self, text: &str) {
        lock(&self.inner).extend_from_slice(text.as_bytes());
    }

    fn writer(&self) -> Box<dyn Write + Send> {
        Box::new(BufferWriter {
            inner: Arc::clone(&self.inner),
        })
    }
}

struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Scoped ownership of the output slots and argument vector.
///
/// Installing the guard swaps fresh capture buffers and the given argv into
/// the process-wide slots; dropping it restores the previous bindings. Drop
/// runs on every exit path, including unwinds, and runs exactly once.
pub struct RedirectGuard {
    prev_stdout: SlotValue,
    prev_stderr: SlotValue,
    prev_argv: Option<Vec<String>>,
}

impl RedirectGuard {
    /// Install capture buffers and the given argument vector.
    pub(crate) fn install(argv: Vec<String>) -> (Self, CaptureBuffer, CaptureBuffer) {
        let out = CaptureBuffer::default();
        let err = CaptureBuffer::default();

        let prev_stdout = lock(&STDOUT_SLOT).replace(out.writer());
        let prev_stderr = lock(&STDERR_SLOT).replace(err.writer());
        let prev_argv = lock(&ARGV_OVERRIDE).replace(argv);

        (
            Self {
                prev_stdout,
                prev_stderr,
                prev_argv,
            },
            out,
            err,
        )
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        *lock(&STDOUT_SLOT) = self.prev_stdout.take();
        *lock(&STDERR_SLOT) = self.prev_stderr.take();
        *lock(&ARGV_OVERRIDE) = self.prev_argv.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::ENV_LOCK;

    #[test]
    fn guard_restores_bindings_on_drop() {
        let _lock = ENV_LOCK.lock().unwrap();
        let before = argv();

        {
            let (_guard, out, _err) =
                RedirectGuard::install(vec!["nethawk".into(), "--help".into()]);
            assert_eq!(argv(), vec!["nethawk".to_string(), "--help".to_string()]);

            writeln!(stdout(), "captured line").unwrap();
            assert_eq!(out.contents(), "captured line\n");
        }

        assert_eq!(argv(), before);
    }

    #[test]
    fn nested_guards_restore_in_reverse_order() {
        let _lock = ENV_LOCK.lock().unwrap();
        let (outer, outer_buf, _e1) = RedirectGuard::install(vec!["outer".into()]);
        {
            let (_inner, inner_buf, _e2) = RedirectGuard::install(vec!["inner".into()]);
            writeln!(stdout(), "inner write").unwrap();
            assert_eq!(inner_buf.contents(), "inner write\n");
            assert_eq!(argv(), vec!["inner".to_string()]);
        }

        writeln!(stdout(), "outer write").unwrap();
        assert_eq!(outer_buf.contents(), "outer write\n");
        assert_eq!(argv(), vec!["outer".to_string()]);
        drop(outer);
    }
}
