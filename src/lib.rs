//! # capsule
//!
//! **Capsule** runs a callable in an isolated unit of concurrency and turns
//! whatever happens into a uniform result.
//!
//! The callable may return, return an error, panic, end abnormally, or run past
//! its deadline. Each case becomes `Ok(value)` or `Err(Failure)`. Failed
//! attempts can be retried after a fixed backoff.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                  capture(callable, options)
//!                              │
//! ┌────────────────────────────▼──────────────────────────────────┐
//! │  Retry loop (core::retry)                                     │
//! │  Attempting(n) ──► Succeeded | Attempting(n+1) | Exhausted    │
//! └──────┬─────────────────────────────────────────────▲──────────┘
//!        ▼                                             │
//! ┌──────────────────────────────┐         ┌───────────┴──────────┐
//! │ Deadline guard               │         │ Classifier           │
//! │ time::timeout + kill switch  │────────►│ RawOutcome → Result  │
//! └──────┬───────────────────────┘ outcome └──────────────────────┘
//!        ▼
//! ┌──────────────────────────────┐
//! │ Isolated unit (own thread)   │
//! │ fault boundary:              │
//! │  catch_unwind + panic hook   │
//! │ reply: oneshot               │
//! │ termination: oneshot (down)  │
//! └──────────────────────────────┘
//!        │
//!        ▼ (terminal failure)
//! report::finish ──► FailureLog::warn (unless skip_log)
//! ```
//!
//! ## Features
//! | Area            | Description                                               | Key types / traits                         |
//! |-----------------|-----------------------------------------------------------|--------------------------------------------|
//! | **Capture**     | Isolated execution, deadline, retries.                    | [`capture`], [`capture_with`]              |
//! | **Callables**   | Closures, blocking closures, named targets with args.     | [`Callable`], [`CallFn`], [`Target`]       |
//! | **Outcomes**    | Raw and classified results, termination reasons.          | [`RawOutcome`], [`Failure`], [`Termination`] |
//! | **Options**     | Timeout, retries, backoff, success policy, diagnostics.   | [`Options`], [`RawOptions`]                |
//! | **Logging**     | Failure reporting seam, `tracing` by default.             | [`FailureLog`], [`TracingLog`]             |
//!
//! ## Isolation caveat
//! Every attempt runs on its own thread, off the caller's scheduler, so a
//! deadline fires on time even when the unit never yields. Async units are
//! aborted at expiry and stop at their next `.await`. A unit that never
//! yields, or a [`Callable::Blocking`] closure, cannot be preempted: its result
//! is discarded but its thread keeps running until it returns.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use capsule::{BoxError, Callable, Failure, Options, capture};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let five = Callable::from_fn("five", || async { Ok::<_, BoxError>(json!(5)) });
//!     assert_eq!(capture(&five, &Options::default()).await.unwrap(), json!(5));
//!
//!     let stuck = Callable::from_fn("stuck", || async {
//!         std::future::pending::<()>().await;
//!         Ok::<_, BoxError>(json!(null))
//!     });
//!     let opts = Options::default()
//!         .with_timeout(Duration::from_millis(50))
//!         .with_skip_log(true);
//!     let err = capture(&stuck, &opts).await.unwrap_err();
//!     assert!(matches!(err, Failure::Timeout { .. }));
//! }
//! ```
mod callables;
mod config;
mod core;
mod error;
mod loggers;
mod outcome;

// ---- Public re-exports ----

pub use callables::{
    BlockingFn, BlockingRef, BoxCallFuture, Call, CallBlocking, CallFn, Callable, FnRef, Target,
    TargetFn, TargetRef,
};
pub use config::{DEFAULT_BACKOFF, DEFAULT_TIMEOUT, Options, RawOptions};
pub use crate::core::{Boundary, Isolated, capture, capture_with, classify, exit, run_with_deadline};
pub use error::{BoxError, ConfigError, Failure};
pub use loggers::{FailureLog, LogContext, TracingLog};
pub use outcome::{RawOutcome, Termination, Trace};
