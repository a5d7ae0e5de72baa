//! # Named targets.
//!
//! A [`Target`] is the (named-target, argument-list) form of a callable: the
//! same target can be applied to different arguments on each call.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BoxError;

/// Shared handle to a target.
pub type TargetRef = Arc<dyn Target>;

/// # Named target applied to an argument list.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use capsule::{BoxError, Target};
/// use serde_json::{json, Value};
///
/// struct Add;
///
/// #[async_trait]
/// impl Target for Add {
///     fn name(&self) -> &str { "math.add" }
///
///     async fn call(&self, args: Vec<Value>) -> Result<Value, BoxError> {
///         let sum: i64 = args.iter().filter_map(Value::as_i64).sum();
///         Ok(json!(sum))
///     }
/// }
/// ```
#[async_trait]
pub trait Target: Send + Sync + 'static {
    /// Returns the target name.
    fn name(&self) -> &str;

    /// Invokes the target with `args`.
    async fn call(&self, args: Vec<Value>) -> Result<Value, BoxError>;
}

/// Function-backed target.
#[derive(Debug)]
pub struct TargetFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TargetFn<F> {
    /// Creates a new function-backed target.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the target and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut, E> Target for TargetFn<F>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, args: Vec<Value>) -> Result<Value, BoxError> {
        (self.f)(args).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_target_fn_receives_args() {
        let t = TargetFn::new("echo", |args: Vec<Value>| async move {
            Ok::<_, BoxError>(Value::Array(args))
        });
        assert_eq!(t.name(), "echo");
        assert_eq!(t.call(vec![json!(1), json!("a")]).await.unwrap(), json!([1, "a"]));
    }
}
