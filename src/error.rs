//! Error types used by capsule.
//!
//! This module defines two main error enums:
//!
//! - [`Failure`] — the classified failure of a call, returned by [`capture`](crate::capture).
//! - [`ConfigError`] — errors raised while resolving [`RawOptions`](crate::RawOptions).
//!
//! [`Failure`] provides helper methods (`as_label`, `as_message`) for logging/metrics
//! and [`Failure::trace`] for diagnostics.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::outcome::{Termination, Trace};

/// Error type a callable may raise.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Classified failure of a call.
///
/// Every way a call can go wrong ends up here; the caller only ever sees
/// `Err(Failure)` and inspects its shape.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum Failure {
    /// The callable returned, but its value did not match the success marker.
    #[error("rejected value: {value}")]
    Rejected {
        /// The returned value, unchanged.
        value: Value,
    },

    /// The callable returned an error or panicked.
    #[error("raised: {error}")]
    Raised {
        /// Rendered error or panic message.
        error: String,
        /// Call stack at the raise point (only when stack traces are requested).
        trace: Option<Trace>,
    },

    /// The isolated unit ended abnormally.
    #[error("terminated: {reason}")]
    Terminated {
        /// Termination cause as surfaced by the runtime.
        reason: Termination,
    },

    /// The attempt exceeded its deadline and the unit was aborted.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },
}

impl Failure {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use capsule::Failure;
    /// use std::time::Duration;
    ///
    /// let err = Failure::Timeout { timeout: Duration::from_millis(50) };
    /// assert_eq!(err.as_label(), "call_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Failure::Rejected { .. } => "call_rejected",
            Failure::Raised { .. } => "call_raised",
            Failure::Terminated { .. } => "call_terminated",
            Failure::Timeout { .. } => "call_timeout",
        }
    }

    /// Returns a human-readable message with details about the failure.
    pub fn as_message(&self) -> String {
        match self {
            Failure::Rejected { value } => format!("rejected: {value}"),
            Failure::Raised { error, .. } => format!("error: {error}"),
            Failure::Terminated { reason } => format!("terminated: {reason}"),
            Failure::Timeout { timeout } => format!("timeout: {timeout:?}"),
        }
    }

    /// Returns the captured stack trace, if any.
    pub fn trace(&self) -> Option<&Trace> {
        match self {
            Failure::Raised { trace, .. } => trace.as_ref(),
            _ => None,
        }
    }

    /// Drops the stack trace, keeping everything else.
    pub(crate) fn without_trace(self) -> Self {
        match self {
            Failure::Raised { error, .. } => Failure::Raised { error, trace: None },
            other => other,
        }
    }
}

/// # Errors produced while resolving options.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `retry_count` must allow at least one attempt.
    #[error("retry_count must be at least 1")]
    ZeroRetryCount,

    /// The options document could not be deserialized.
    #[error("invalid options: {0}")]
    Invalid(#[from] serde_json::Error),
}
