//! # Final shaping of a call's result.
//!
//! Applied once, after the last attempt:
//! - drops the stack trace unless `stacktrace` is set;
//! - reports the failure to the [`FailureLog`] unless `skip_log` is set.

use serde_json::Value;

use crate::config::Options;
use crate::error::Failure;
use crate::loggers::{FailureLog, LogContext};

/// Shapes the terminal result and logs failures.
pub(crate) fn finish(
    result: Result<Value, Failure>,
    options: &Options,
    context: &LogContext,
    log: &dyn FailureLog,
) -> Result<Value, Failure> {
    let failure = match result {
        Ok(value) => return Ok(value),
        Err(failure) if options.stacktrace => failure,
        Err(failure) => failure.without_trace(),
    };
    if !options.skip_log {
        log.warn(&failure, context);
    }
    Err(failure)
}
