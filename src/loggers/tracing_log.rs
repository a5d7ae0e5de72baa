//! # TracingLog — default failure logger
//!
//! Emits one `WARN` event per terminal failure through `tracing`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! WARN capsule: call failed callable="fetch" attempts=3 label="call_timeout" reason="timeout: 50ms"
//! ```

use tracing::warn;

use crate::error::Failure;
use crate::loggers::{FailureLog, LogContext};

/// Failure logger backed by `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl TracingLog {
    /// Construct a new [`TracingLog`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FailureLog for TracingLog {
    fn warn(&self, failure: &Failure, ctx: &LogContext) {
        match failure.trace() {
            Some(trace) => warn!(
                callable = %ctx.callable,
                attempts = ctx.attempts,
                elapsed = ?ctx.elapsed,
                label = failure.as_label(),
                reason = %failure.as_message(),
                trace = %trace,
                "call failed"
            ),
            None => warn!(
                callable = %ctx.callable,
                attempts = ctx.attempts,
                elapsed = ?ctx.elapsed,
                label = failure.as_label(),
                reason = %failure.as_message(),
                "call failed"
            ),
        }
    }
}
