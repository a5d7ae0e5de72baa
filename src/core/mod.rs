//! Call core: isolation, deadline, classification, retries.
//!
//! This module contains the hard part of capsule. The public API from this
//! module is [`capture`] / [`capture_with`], plus the building blocks for
//! callers that want a single attempt.
//!
//! Internal modules:
//! - [`fault`]: panic hook and fault boundary turning raises into outcomes;
//! - [`runner`]: starts one isolated unit and receives its single outcome;
//! - [`deadline`]: races a unit against its timeout, aborting on expiry;
//! - [`classify`]: maps raw outcomes to `Ok` / `Err`;
//! - [`retry`]: the attempt loop with fixed backoff;
//! - [`report`]: trace stripping and failure logging.

mod classify;
mod deadline;
pub(crate) mod fault;
mod report;
mod retry;
mod runner;

pub use classify::classify;
pub use deadline::run_with_deadline;
pub use fault::{Boundary, exit};
pub use retry::{capture, capture_with};
pub use runner::Isolated;
