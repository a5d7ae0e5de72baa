//! # Raw outcomes of a single isolated attempt.
//!
//! A [`RawOutcome`] is produced exactly once per attempt by the isolated runner,
//! before any success policy is applied:
//!
//! ```text
//! callable ──► returns value        ──► RawOutcome::Returned(value)
//!          ──► returns Err / panics ──► RawOutcome::Raised { error, trace }
//!          ──► exits / is killed    ──► RawOutcome::Terminated(reason)
//! ```
//!
//! The classifier later turns it into `Result<Value, Failure>`.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Raw result of one execution attempt.
#[derive(Debug)]
pub enum RawOutcome {
    /// The callable completed and produced a value.
    Returned(Value),
    /// The callable returned an error or panicked inside the fault boundary.
    Raised {
        /// Rendered error or panic message.
        error: String,
        /// Call stack at the raise point, when capture was requested.
        trace: Option<Trace>,
    },
    /// The unit ended without returning or raising through the normal path.
    Terminated(Termination),
}

/// Cause of an abnormal termination, forwarded verbatim to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The unit called [`exit`](crate::exit) with this reason.
    Exit(Value),
    /// The unit was aborted from outside.
    Killed,
    /// The unit ended without delivering an outcome.
    Vanished,
    /// A fault escaped the boundary (e.g. a panic while unwinding).
    Panicked(String),
    /// The unit could not be started (thread or runtime creation failed).
    Unstarted(String),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exit(reason) => write!(f, "exit: {reason}"),
            Termination::Killed => f.write_str("killed"),
            Termination::Vanished => f.write_str("ended without reply"),
            Termination::Panicked(msg) => write!(f, "panicked: {msg}"),
            Termination::Unstarted(msg) => write!(f, "not started: {msg}"),
        }
    }
}

/// Captured call stack of a raise.
///
/// Cheap to clone; the backtrace itself is shared.
#[derive(Clone)]
pub struct Trace(Arc<Backtrace>);

impl Trace {
    /// Captures the current call stack unconditionally (ignores `RUST_BACKTRACE`).
    pub(crate) fn capture() -> Self {
        Self(Arc::new(Backtrace::force_capture()))
    }

    /// Returns the underlying backtrace.
    pub fn backtrace(&self) -> &Backtrace {
        &self.0
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0.as_ref(), f)
    }
}

impl fmt::Debug for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_ref(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_termination_display_forwards_exit_reason() {
        let t = Termination::Exit(json!({"code": 3}));
        assert_eq!(t.to_string(), r#"exit: {"code":3}"#);
        assert_eq!(Termination::Killed.to_string(), "killed");
    }

    #[test]
    fn test_trace_renders_frames() {
        let trace = Trace::capture();
        assert!(!trace.to_string().is_empty());
        let cloned = trace.clone();
        assert!(Arc::ptr_eq(&trace.0, &cloned.0));
    }
}
