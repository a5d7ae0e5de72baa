//! # Capture: retry loop around isolated attempts.
//!
//! ## Architecture
//! ```text
//! capture(callable, options)
//!
//! Attempting(1)
//! loop {
//!   ├─► run_with_deadline() ──► Isolated unit ──► RawOutcome
//!   │         │                                      ▼
//!   │         └─ deadline hit ─► Err(Timeout)    classify()
//!   │                                                ▼
//!   ├─► Ok   ──► Succeeded         (return, budget ignored)
//!   └─► Err
//!        ├─ n <  attempts ─► sleep(backoff) ─► Attempting(n + 1)
//!        └─ n == attempts ─► ExhaustedFailure (return last Err)
//! }
//! report::finish() ──► strip trace / log failure ──► caller
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** (never concurrent for one call)
//! - Backoff is a fixed wait, applied between attempts only
//! - The last failure is always the one returned

use std::time::Instant;

use serde_json::Value;
use tokio::time;
use tracing::debug;

use crate::callables::Callable;
use crate::config::Options;
use crate::core::classify::classify;
use crate::core::deadline::run_with_deadline;
use crate::core::fault::Boundary;
use crate::core::report;
use crate::error::Failure;
use crate::loggers::{FailureLog, LogContext, TracingLog};

/// Runs `callable` in isolation and returns its classified result.
///
/// Failures are logged through [`TracingLog`]. Must be called from within a
/// tokio runtime.
///
/// # Example
/// ```rust
/// use capsule::{BoxError, Callable, Options, capture};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let five = Callable::from_fn("five", || async { Ok::<_, BoxError>(json!(5)) });
/// assert_eq!(capture(&five, &Options::default()).await.unwrap(), json!(5));
/// # }
/// ```
pub async fn capture(callable: &Callable, options: &Options) -> Result<Value, Failure> {
    capture_with(callable, options, &TracingLog).await
}

/// Same as [`capture`], reporting terminal failures to `log`.
pub async fn capture_with(
    callable: &Callable,
    options: &Options,
    log: &dyn FailureLog,
) -> Result<Value, Failure> {
    let started = Instant::now();
    let boundary = Boundary {
        capture_trace: options.stacktrace,
        propagate: options.propagate_crash,
    };
    let budget = options.attempts();
    let mut attempt: u32 = 0;

    let result = loop {
        attempt += 1;
        debug!(callable = callable.name(), attempt, "attempt starting");

        let res = run_with_deadline(callable, boundary, options.deadline())
            .await
            .and_then(|raw| classify(raw, options.ok_tuple));

        match res {
            Ok(value) => break Ok(value),
            Err(failure) if attempt < budget => {
                debug!(
                    callable = callable.name(),
                    attempt,
                    delay = ?options.backoff,
                    error = %failure,
                    "attempt failed, backoff scheduled"
                );
                time::sleep(options.backoff).await;
            }
            Err(failure) => break Err(failure),
        }
    };

    let context = LogContext {
        callable: callable.name().to_string(),
        attempts: attempt,
        elapsed: started.elapsed(),
    };
    report::finish(result, options, &context, log)
}
