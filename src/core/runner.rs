//! # Run a single attempt in an isolated unit.
//!
//! Starts the callable on its own OS thread and delivers exactly one
//! [`RawOutcome`] to the supervising side. Async callables are driven by a
//! private current-thread runtime on that thread, so nothing the callable
//! does can occupy the caller's scheduler.
//!
//! ## Detection paths
//!
//! ```text
//! unit thread ── reply (oneshot) ───────► Returned / Raised
//!             └─ down  (oneshot) ───────► Terminated(Exit | Killed | Panicked | Vanished | Unstarted)
//! ```
//!
//! ## Rules
//! - The reply channel is polled first; whichever path fires first wins
//! - A unit that ends without a reply is classified from its down report
//! - Raises are captured **inside** the unit; nothing unwinds into the caller
//! - Tasks the callable spawns die with the unit's runtime
//! - A unit is never reused: one [`Isolated`] per attempt

use std::any::Any;
use std::future::Future;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use tokio::runtime;
use tokio::sync::oneshot;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::callables::Callable;
use crate::core::fault::{self, Boundary, Exit};
use crate::outcome::{RawOutcome, Termination};

/// How the unit ended; `None` means it finished through the normal path.
type Down = Option<Termination>;

/// Handle to one running isolated unit.
///
/// Owned by the deadline guard for exactly one attempt.
pub struct Isolated {
    reply: oneshot::Receiver<RawOutcome>,
    down: oneshot::Receiver<Down>,
    kill: CancellationToken,
}

/// First signal observed from the unit.
enum Signal {
    Reply(Result<RawOutcome, oneshot::error::RecvError>),
    Down(Result<Down, oneshot::error::RecvError>),
}

impl Isolated {
    /// Starts `callable` on a fresh unit thread under `boundary`.
    pub fn spawn(callable: &Callable, boundary: Boundary) -> Self {
        fault::install_hook();
        let (tx, reply) = oneshot::channel();
        let (down_tx, down) = oneshot::channel();
        let kill = CancellationToken::new();

        let name = format!("capsule:{}", callable.name());
        let launched = match callable {
            Callable::Fn(f) => {
                let f = Arc::clone(f);
                let kill = kill.clone();
                launch(name, move || {
                    drive(
                        async move {
                            let raw = fault::guard(boundary, async move { f.call().await }).await;
                            let _ = tx.send(raw);
                        },
                        kill,
                        down_tx,
                    )
                })
            }
            Callable::Apply { target, args } => {
                let target = Arc::clone(target);
                let args = args.clone();
                let kill = kill.clone();
                launch(name, move || {
                    drive(
                        async move {
                            let raw =
                                fault::guard(boundary, async move { target.call(args).await }).await;
                            let _ = tx.send(raw);
                        },
                        kill,
                        down_tx,
                    )
                })
            }
            Callable::Blocking(f) => {
                let f = Arc::clone(f);
                launch(name, move || {
                    let ran = panic::catch_unwind(AssertUnwindSafe(|| {
                        fault::guard_blocking(boundary, || f.call())
                    }));
                    match ran {
                        Ok(raw) => {
                            let _ = tx.send(raw);
                            let _ = down_tx.send(None);
                        }
                        Err(payload) => {
                            let _ = down_tx.send(Some(from_panic(payload)));
                        }
                    }
                })
            }
        };

        match launched {
            Ok(()) => Self { reply, down, kill },
            Err(err) => Self::unstarted(err.to_string()),
        }
    }

    /// A unit whose thread could not be created.
    fn unstarted(reason: String) -> Self {
        let (_, reply) = oneshot::channel();
        let (down_tx, down) = oneshot::channel();
        let _ = down_tx.send(Some(Termination::Unstarted(reason)));
        Self {
            reply,
            down,
            kill: CancellationToken::new(),
        }
    }

    /// Kills the unit without cooperation from the callable.
    ///
    /// Async units stop at their next suspension point. A unit that never
    /// yields, and any blocking unit, keeps its thread until it returns.
    pub fn abort(&self) {
        self.kill.cancel();
    }

    /// Returns a token that kills the unit after `self` is consumed.
    pub fn kill_switch(&self) -> CancellationToken {
        self.kill.clone()
    }

    /// Waits for the unit's single outcome.
    pub async fn outcome(mut self) -> RawOutcome {
        let signal = tokio::select! {
            biased;
            r = &mut self.reply => Signal::Reply(r),
            d = &mut self.down => Signal::Down(d),
        };

        match signal {
            Signal::Reply(Ok(raw)) => raw,
            // Sender dropped without a reply: the unit is unwinding or gone.
            Signal::Reply(Err(_)) => ended((&mut self.down).await),
            // The reply is sent before the normal down report.
            Signal::Down(Ok(None)) => self
                .reply
                .try_recv()
                .unwrap_or(RawOutcome::Terminated(Termination::Vanished)),
            Signal::Down(down) => ended(down),
        }
    }
}

/// Spawns the unit thread.
fn launch<F>(name: String, body: F) -> io::Result<()>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new().name(name).spawn(body).map(drop)
}

/// Drives `unit` to completion on a private runtime, aborting it on `kill`.
fn drive<F>(unit: F, kill: CancellationToken, down: oneshot::Sender<Down>)
where
    F: Future<Output = ()> + Send + 'static,
{
    let rt = match runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            let _ = down.send(Some(Termination::Unstarted(err.to_string())));
            return;
        }
    };

    let joined = rt.block_on(async move {
        let mut task = tokio::spawn(unit);
        let early = tokio::select! {
            joined = &mut task => Some(joined),
            _ = kill.cancelled() => None,
        };
        match early {
            Some(joined) => joined,
            None => {
                task.abort();
                task.await
            }
        }
    });
    let _ = down.send(joined.err().map(from_join_error));
}

/// Maps a failed join of the unit task to a termination reason.
fn from_join_error(err: JoinError) -> Termination {
    if err.is_cancelled() {
        return Termination::Killed;
    }
    match err.try_into_panic() {
        Ok(payload) => from_panic(payload),
        Err(_) => Termination::Killed,
    }
}

/// Maps a payload that escaped the fault boundary to a termination reason.
fn from_panic(payload: Box<dyn Any + Send>) -> Termination {
    match payload.downcast::<Exit>() {
        Ok(exit) => Termination::Exit(exit.0),
        Err(other) => Termination::Panicked(fault::panic_message(other.as_ref())),
    }
}

/// Terminated outcome from the down report.
fn ended(down: Result<Down, oneshot::error::RecvError>) -> RawOutcome {
    let reason = match down {
        Ok(Some(reason)) => reason,
        Ok(None) | Err(_) => Termination::Vanished,
    };
    RawOutcome::Terminated(reason)
}
