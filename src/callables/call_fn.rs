//! # Function-backed callables (`CallFn`, `BlockingFn`)
//!
//! [`CallFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per
//! attempt. [`BlockingFn`] wraps a synchronous closure that runs directly on
//! the dedicated unit thread.
//!
//! ## Concurrency semantics
//! - Each attempt calls the closure again and owns the resulting state.
//! - No hidden mutation between retries; share state explicitly with `Arc<...>`.
//!
//! ## Example
//! ```rust
//! use capsule::{BoxError, Call, CallFn, FnRef};
//! use serde_json::json;
//!
//! let f: FnRef = CallFn::arc("answer", || async { Ok::<_, BoxError>(json!(42)) });
//! assert_eq!(f.name(), "answer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::BoxError;

/// Boxed future returned by [`Call::call`].
pub type BoxCallFuture = Pin<Box<dyn Future<Output = Result<Value, BoxError>> + Send + 'static>>;

/// Shared handle to an async zero-argument callable.
pub type FnRef = Arc<dyn Call>;

/// Shared handle to a blocking zero-argument callable.
pub type BlockingRef = Arc<dyn CallBlocking>;

/// # Async zero-argument callable.
pub trait Call: Send + Sync + 'static {
    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Creates the future for one attempt.
    fn call(&self) -> BoxCallFuture;
}

/// # Blocking zero-argument callable.
pub trait CallBlocking: Send + Sync + 'static {
    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Runs one attempt to completion on the current thread.
    fn call(&self) -> Result<Value, BoxError>;
}

/// Function-backed async callable.
///
/// Wraps a closure that *creates* a new future per attempt.
#[derive(Debug)]
pub struct CallFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> CallFn<F> {
    /// Creates a new function-backed callable.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the callable and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut, E> Call for CallFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<Value, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self) -> BoxCallFuture {
        let fut = (self.f)();
        Box::pin(async move { fut.await.map_err(Into::into) })
    }
}

/// Function-backed blocking callable.
#[derive(Debug)]
pub struct BlockingFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> BlockingFn<F> {
    /// Creates a new blocking callable.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the callable and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, E> CallBlocking for BlockingFn<F>
where
    F: Fn() -> Result<Value, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self) -> Result<Value, BoxError> {
        (self.f)().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_call_fn_creates_fresh_future() {
        let f = CallFn::new("five", || async { Ok::<_, BoxError>(json!(5)) });
        assert_eq!(f.call().await.unwrap(), json!(5));
        assert_eq!(f.call().await.unwrap(), json!(5));
    }

    #[tokio::test]
    async fn test_call_fn_boxes_custom_error() {
        let f = CallFn::new("bad", || async { Err::<Value, _>(std::fmt::Error) });
        let err = f.call().await.unwrap_err();
        assert_eq!(err.to_string(), std::fmt::Error.to_string());
    }

    #[test]
    fn test_blocking_fn() {
        let f = BlockingFn::new("sum", || Ok::<_, BoxError>(json!(1 + 2)));
        assert_eq!(f.name(), "sum");
        assert_eq!(f.call().unwrap(), json!(3));
    }
}
