//! # Callable abstractions.
//!
//! This module provides what a call can execute:
//! - [`Callable`] - the one thing a call runs (closure, blocking closure, or target + args)
//! - [`CallFn`] / [`BlockingFn`] - function-backed zero-argument callables
//! - [`Target`] - trait for named targets invoked with an argument list
//! - [`TargetFn`] - function-backed target implementation

mod call_fn;
mod callable;
mod target;

pub use call_fn::{BlockingFn, BlockingRef, BoxCallFuture, Call, CallBlocking, CallFn, FnRef};
pub use callable::Callable;
pub use target::{Target, TargetFn, TargetRef};
