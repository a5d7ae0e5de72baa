//! # Race one attempt against its deadline.
//!
//! ```text
//! Isolated::spawn ──► outcome() ─┐
//!                                ├─ first wins
//! time::timeout(dur) ────────────┘
//!
//! outcome first  ──► Ok(RawOutcome)
//! deadline first ──► abort unit ──► Err(Failure::Timeout)   (no classification)
//! ```
//!
//! ## Rules
//! - Termination at expiry is unconditional: no grace period, no signal to the callable
//! - The aborted unit is never awaited again; any late outcome is dropped
//! - The timer runs on the caller's scheduler, the unit on its own thread, so
//!   expiry fires on time even if the callable never yields
//! - A unit that never yields cannot be preempted: its thread keeps running
//! - `None` deadline → wait for the outcome indefinitely

use std::time::Duration;

use tokio::time;
use tracing::debug;

use crate::callables::Callable;
use crate::core::fault::Boundary;
use crate::core::runner::Isolated;
use crate::error::Failure;
use crate::outcome::RawOutcome;

/// Runs `callable` once, bounded by `timeout`.
///
/// On expiry the unit is killed and `Failure::Timeout` is returned directly.
pub async fn run_with_deadline(
    callable: &Callable,
    boundary: Boundary,
    timeout: Option<Duration>,
) -> Result<RawOutcome, Failure> {
    let unit = Isolated::spawn(callable, boundary);
    let Some(dur) = timeout else {
        return Ok(unit.outcome().await);
    };

    let kill = unit.kill_switch();
    match time::timeout(dur, unit.outcome()).await {
        Ok(raw) => Ok(raw),
        Err(_elapsed) => {
            kill.cancel();
            debug!(callable = callable.name(), timeout = ?dur, "deadline hit, unit killed");
            Err(Failure::Timeout { timeout: dur })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;

    use serde_json::{Value, json};

    use crate::error::BoxError;

    /// Flags when the owning future is dropped.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_fast_outcome_wins() {
        let c = Callable::from_fn("fast", || async { Ok::<_, BoxError>(json!("done")) });
        let raw = run_with_deadline(&c, Boundary::default(), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert!(matches!(raw, RawOutcome::Returned(v) if v == json!("done")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_expiry_aborts_unit() {
        let dropped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&dropped);
        let c = Callable::from_fn("forever", move || {
            let guard = DropFlag(Arc::clone(&flag));
            async move {
                let _guard = guard;
                std::future::pending::<()>().await;
                Ok::<_, BoxError>(Value::Null)
            }
        });

        let started = Instant::now();
        let res = run_with_deadline(&c, Boundary::default(), Some(Duration::from_millis(50))).await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(matches!(res, Err(Failure::Timeout { timeout }) if timeout == Duration::from_millis(50)));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(dropped.load(Ordering::SeqCst), "aborted unit was not released");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_expiry_fires_for_non_yielding_unit() {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let c = Callable::from_fn("spin", move || {
            let flag = Arc::clone(&flag);
            async move {
                while !flag.load(Ordering::Relaxed) {
                    std::hint::spin_loop();
                }
                Ok::<_, BoxError>(Value::Null)
            }
        });

        let started = Instant::now();
        let res = run_with_deadline(&c, Boundary::default(), Some(Duration::from_millis(50))).await;
        stop.store(true, Ordering::Relaxed);

        assert!(matches!(res, Err(Failure::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_no_deadline_waits() {
        let c = Callable::from_fn("slow", || async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, BoxError>(json!(1))
        });
        let raw = run_with_deadline(&c, Boundary::default(), None).await.unwrap();
        assert!(matches!(raw, RawOutcome::Returned(v) if v == json!(1)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_unit_times_out() {
        let c = Callable::blocking("spin", || {
            std::thread::sleep(Duration::from_millis(300));
            Ok::<_, BoxError>(Value::Null)
        });
        let started = Instant::now();
        let res = run_with_deadline(&c, Boundary::default(), Some(Duration::from_millis(30))).await;
        assert!(matches!(res, Err(Failure::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_millis(300));
    }
}
