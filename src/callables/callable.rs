//! # The callable a call executes.
//!
//! [`Callable`] holds exactly one representation of the work:
//! - an async zero-argument closure ([`Callable::Fn`]),
//! - a blocking zero-argument closure ([`Callable::Blocking`]),
//! - a named target with its argument list ([`Callable::Apply`]).
//!
//! Cloning is cheap (shared handles), so the same callable can be re-run on
//! every retry attempt.

use std::borrow::Cow;
use std::future::Future;

use serde_json::Value;

use crate::callables::call_fn::{BlockingFn, BlockingRef, CallFn, FnRef};
use crate::callables::target::TargetRef;
use crate::error::BoxError;

/// Work executed by one call.
///
/// ## Example
/// ```rust
/// use capsule::{BoxError, Callable, TargetFn};
/// use serde_json::{json, Value};
///
/// let f = Callable::from_fn("five", || async { Ok::<_, BoxError>(json!(5)) });
/// assert_eq!(f.name(), "five");
///
/// let add = TargetFn::arc("add", |args: Vec<Value>| async move {
///     Ok::<_, BoxError>(json!(args.iter().filter_map(Value::as_i64).sum::<i64>()))
/// });
/// let apply = Callable::apply(add, vec![json!(1), json!(2)]);
/// assert_eq!(apply.name(), "add");
/// ```
#[derive(Clone)]
pub enum Callable {
    /// Async zero-argument closure, run as an abortable task on the unit thread.
    Fn(FnRef),
    /// Blocking zero-argument closure, run directly on the unit thread.
    Blocking(BlockingRef),
    /// Named target applied to an argument list.
    Apply {
        /// Target to invoke.
        target: TargetRef,
        /// Arguments passed on every attempt.
        args: Vec<Value>,
    },
}

impl Callable {
    /// Wraps an async closure.
    pub fn from_fn<F, Fut, E>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Callable::Fn(CallFn::arc(name, f))
    }

    /// Wraps a blocking closure.
    ///
    /// A blocking closure cannot be preempted: on timeout its thread is
    /// detached and its eventual result dropped.
    pub fn blocking<F, E>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn() -> Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Callable::Blocking(BlockingFn::arc(name, f))
    }

    /// Pairs a target with its arguments.
    pub fn apply(target: TargetRef, args: Vec<Value>) -> Self {
        Callable::Apply { target, args }
    }

    /// Returns the name used in logs.
    pub fn name(&self) -> &str {
        match self {
            Callable::Fn(f) => f.name(),
            Callable::Blocking(f) => f.name(),
            Callable::Apply { target, .. } => target.name(),
        }
    }
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Fn(_) => f.debug_tuple("Fn").field(&self.name()).finish(),
            Callable::Blocking(_) => f.debug_tuple("Blocking").field(&self.name()).finish(),
            Callable::Apply { args, .. } => f
                .debug_struct("Apply")
                .field("target", &self.name())
                .field("args", args)
                .finish(),
        }
    }
}
