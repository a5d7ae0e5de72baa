//! # Failure logging collaborators.
//!
//! [`FailureLog`] is the extension point that receives terminal failures of a
//! call. It is invoked **at most once** per call, only on failure, and never
//! when `skip_log` is set.
//!
//! ## Contents
//! - [`FailureLog`] the collaborator contract
//! - [`LogContext`] metadata about the failed call
//! - [`TracingLog`] default implementation emitting `tracing` warnings

mod tracing_log;

use std::time::Duration;

use crate::error::Failure;

pub use tracing_log::TracingLog;

/// Metadata attached to a failure report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogContext {
    /// Name of the callable.
    pub callable: String,
    /// Attempts made, including the last one.
    pub attempts: u32,
    /// Wall-clock time spent in the call, backoff included.
    pub elapsed: Duration,
}

/// Contract for failure loggers.
///
/// Called on the caller's task; implementations should not block.
///
/// ## Example (skeleton)
/// ```rust
/// use capsule::{Failure, FailureLog, LogContext};
///
/// struct Audit;
///
/// impl FailureLog for Audit {
///     fn warn(&self, failure: &Failure, ctx: &LogContext) {
///         eprintln!("{} failed after {} attempts: {failure}", ctx.callable, ctx.attempts);
///     }
/// }
/// ```
pub trait FailureLog: Send + Sync {
    /// Reports one terminal failure.
    fn warn(&self, failure: &Failure, context: &LogContext);
}
