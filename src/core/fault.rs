//! # Fault boundary around callable execution.
//!
//! Every attempt runs inside a boundary that converts whatever the callable
//! does into a [`RawOutcome`]:
//!
//! ```text
//! Ok(value)            ──► Returned(value)
//! Err(error)           ──► Raised { error, trace }
//! panic!(..)           ──► Raised { message, trace }   (hook captures trace)
//! exit(reason)         ──► escapes the boundary        (seen as Terminated)
//! ```
//!
//! ## Panic hook
//! A process-wide hook is installed once and chains the previous one:
//! - inside a boundary: captures a backtrace if requested, forwards to the
//!   previous hook only when the boundary propagates crashes;
//! - outside any boundary: always forwards to the previous hook.
//!
//! The boundary is carried as a tokio task-local, so the hook sees it on
//! whatever worker thread polls the unit.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if the callable uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::any::Any;
use std::cell::RefCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use futures::FutureExt;
use serde_json::Value;

use crate::error::BoxError;
use crate::outcome::{RawOutcome, Trace};

/// Crash policy of one attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Boundary {
    /// Capture a stack trace at the raise point.
    pub capture_trace: bool,
    /// Also forward panics to the previously installed panic hook.
    pub propagate: bool,
}

tokio::task_local! {
    static BOUNDARY: Boundary;
}

thread_local! {
    static LAST_TRACE: RefCell<Option<Trace>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// Unwind payload used by [`exit`].
pub(crate) struct Exit(pub(crate) Value);

/// Ends the current isolated unit abnormally with `reason`.
///
/// The unit neither returns nor raises: the call observes
/// `Failure::Terminated { reason: Termination::Exit(reason) }`. No panic
/// hook runs. Outside a unit this unwinds the current thread silently.
pub fn exit(reason: impl Into<Value>) -> ! {
    panic::resume_unwind(Box::new(Exit(reason.into())))
}

/// Installs the chaining panic hook (idempotent).
pub(crate) fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| match BOUNDARY.try_with(|b| *b) {
            Ok(boundary) => {
                if boundary.capture_trace {
                    LAST_TRACE.with(|slot| *slot.borrow_mut() = Some(Trace::capture()));
                }
                if boundary.propagate {
                    previous(info);
                }
            }
            Err(_) => previous(info),
        }));
    });
}

/// Runs `fut` inside the boundary.
pub(crate) async fn guard<F>(boundary: Boundary, fut: F) -> RawOutcome
where
    F: Future<Output = Result<Value, BoxError>>,
{
    let caught = BOUNDARY
        .scope(boundary, AssertUnwindSafe(fut).catch_unwind())
        .await;
    settle(boundary, caught)
}

/// Runs `f` inside the boundary on the current thread.
pub(crate) fn guard_blocking<F>(boundary: Boundary, f: F) -> RawOutcome
where
    F: FnOnce() -> Result<Value, BoxError>,
{
    let caught = BOUNDARY.sync_scope(boundary, || panic::catch_unwind(AssertUnwindSafe(f)));
    settle(boundary, caught)
}

fn settle(
    boundary: Boundary,
    caught: Result<Result<Value, BoxError>, Box<dyn Any + Send>>,
) -> RawOutcome {
    let hooked = LAST_TRACE.with(|slot| slot.borrow_mut().take());
    match caught {
        Ok(Ok(value)) => RawOutcome::Returned(value),
        Ok(Err(err)) => RawOutcome::Raised {
            error: err.to_string(),
            trace: boundary.capture_trace.then(Trace::capture),
        },
        Err(payload) if payload.is::<Exit>() => panic::resume_unwind(payload),
        Err(payload) => RawOutcome::Raised {
            error: panic_message(payload.as_ref()),
            trace: hooked.filter(|_| boundary.capture_trace),
        },
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn traced() -> Boundary {
        Boundary {
            capture_trace: true,
            propagate: false,
        }
    }

    #[tokio::test]
    async fn test_returned_value() {
        install_hook();
        let raw = guard(Boundary::default(), async { Ok::<_, BoxError>(json!(5)) }).await;
        assert!(matches!(raw, RawOutcome::Returned(v) if v == json!(5)));
    }

    #[tokio::test]
    async fn test_error_is_raised_with_trace() {
        install_hook();
        let raw = guard(traced(), async { Err::<Value, BoxError>("x".into()) }).await;
        match raw {
            RawOutcome::Raised { error, trace } => {
                assert_eq!(error, "x");
                assert!(!trace.unwrap().to_string().is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        install_hook();
        let raw = guard(traced(), async {
            if true {
                panic!("kaboom");
            }
            Ok::<_, BoxError>(Value::Null)
        })
        .await;
        match raw {
            RawOutcome::Raised { error, trace } => {
                assert_eq!(error, "kaboom");
                assert!(trace.is_some());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_blocking_panic_without_trace() {
        install_hook();
        let raw = guard_blocking(Boundary::default(), || panic!("{}", String::from("owned")));
        match raw {
            RawOutcome::Raised { error, trace } => {
                assert_eq!(error, "owned");
                assert!(trace.is_none());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_exit_escapes_boundary() {
        install_hook();
        let escaped = panic::catch_unwind(|| {
            guard_blocking(Boundary::default(), || exit(json!("bye")))
        })
        .unwrap_err();
        let exit = escaped.downcast::<Exit>().ok().unwrap();
        assert_eq!(exit.0, json!("bye"));
    }

    #[test]
    fn test_panic_message_fallback() {
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
