//! Process-wide interrupt flag, set by the ctrlc handler for SIGINT/SIGTERM.
//!
//! Notes:
//! - The CLI wraps its source in `InterruptibleReader`, so an interrupt during a
//!   write fails the copy and the staging file is rolled back. A write that is
//!   already renaming or syncing runs to completion.
//! - Relaxed atomics are sufficient for a one-way "stop" flag.
//! - `request()` is safe to call from signal handlers.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

/// Check whether a shutdown has been requested.
#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Test-only: clear the shutdown flag.
#[cfg(test)]
#[inline]
pub fn reset() {
    SHUTDOWN.store(false, Ordering::Relaxed);
}

/// Source wrapper that fails once a shutdown has been requested.
///
/// Ctrl-C in a pipeline usually kills the producer as well, and the closed pipe
/// reads as a clean EOF. The flag is checked before and after every read, so an
/// EOF seen after an interrupt is an error. The error kind is `Other`:
/// `io::copy` retries `Interrupted`.
pub struct InterruptibleReader<R> {
    inner: R,
}

impl<R: Read> InterruptibleReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

fn interrupted() -> io::Error {
    io::Error::other("interrupted")
}

impl<R: Read> Read for InterruptibleReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if is_requested() {
            return Err(interrupted());
        }
        let n = self.inner.read(buf)?;
        if is_requested() {
            return Err(interrupted());
        }
        Ok(n)
    }
}
