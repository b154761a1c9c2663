//! Self-driven render thread.
//!
//! The engine is moved onto the thread when the surface opens and comes back
//! through the join when it closes, so it is never reachable from two threads
//! at once. The only state shared with the caller lives in [`LoopShared`].

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, SendError, Sender};

use super::config::StepErrorPolicy;
use super::error::BridgeError;
use crate::engine::{Engine, EngineCall, EngineError};
use crate::surface::{SharedSize, SurfaceSize};

/// First engine failure seen by the loop.
pub(crate) type LoopFault = (EngineCall, EngineError);

/// State shared between the event-delivery thread and the render thread.
#[derive(Debug, Default)]
pub(crate) struct LoopShared {
    pub(crate) running: AtomicBool,
    pub(crate) size: SharedSize,
    /// Set after each size store; the loop clears it and resizes the engine.
    pub(crate) resize_pending: AtomicBool,
    /// `step` calls made, failed ones included, across all surfaces.
    pub(crate) frames: AtomicU64,
    pub(crate) step_failures: AtomicU64,
}

/// What the render thread hands back on exit.
pub(crate) struct LoopOutcome<E> {
    pub(crate) engine: E,
    pub(crate) fault: Option<LoopFault>,
}

/// Signals the waiting side when the thread body finishes, unwinding or not.
struct ExitNotice(Sender<()>);

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.0.try_send(());
    }
}

/// Owned handle to a running render loop.
pub(crate) struct RenderThread<E> {
    handle: JoinHandle<Option<LoopOutcome<E>>>,
    exited: Receiver<()>,
    shared: Arc<LoopShared>,
    exit_seen: bool,
}

impl<E> RenderThread<E>
where
    E: Engine + Send + 'static,
{
    /// Starts the loop with `engine`. On failure the engine is returned so the
    /// caller can still deinit it.
    pub(crate) fn spawn(
        name: &str,
        policy: StepErrorPolicy,
        engine: E,
        shared: &Arc<LoopShared>,
    ) -> Result<Self, (E, io::Error)> {
        // `Builder::spawn` panics on these instead of returning an error.
        if name.contains('\0') {
            let e = io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("thread name {name:?} contains a NUL byte"),
            );
            return Err((engine, e));
        }

        let (engine_tx, engine_rx) = crossbeam_channel::bounded::<E>(1);
        let (exit_tx, exit_rx) = crossbeam_channel::bounded::<()>(1);

        shared.running.store(true, Ordering::Release);
        let loop_shared = Arc::clone(shared);

        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _exit = ExitNotice(exit_tx);
                let mut engine = engine_rx.recv().ok()?;
                let fault = run_guarded(&mut engine, &loop_shared, policy);
                Some(LoopOutcome { engine, fault })
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                shared.running.store(false, Ordering::Release);
                return Err((engine, e));
            }
        };

        // Handing the engine over after the spawn keeps it on this side if the
        // spawn fails.
        if let Err(SendError(engine)) = engine_tx.send(engine) {
            shared.running.store(false, Ordering::Release);
            let _ = handle.join();
            return Err((engine, io::Error::other("render thread exited before start")));
        }

        Ok(Self {
            handle,
            exited: exit_rx,
            shared: Arc::clone(shared),
            exit_seen: false,
        })
    }

    /// Clears the running flag. The loop notices before its next step.
    pub(crate) fn request_stop(&self) {
        self.shared.running.store(false, Ordering::Release);
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Waits for the thread body to finish, at most `timeout` if given.
    ///
    /// A timeout leaves the handle intact so the wait can be resumed.
    pub(crate) fn wait_exit(&mut self, timeout: Option<Duration>) -> Result<(), BridgeError> {
        if self.exit_seen {
            return Ok(());
        }

        match timeout {
            // A disconnect also means the notice was dropped, i.e. the body ended.
            None => {
                let _ = self.exited.recv();
            }
            Some(timeout) => match self.exited.recv_timeout(timeout) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
                Err(RecvTimeoutError::Timeout) => {
                    return Err(BridgeError::TeardownTimeout { timeout });
                }
            },
        }

        self.exit_seen = true;
        Ok(())
    }

    /// Joins the thread and takes the engine back.
    pub(crate) fn join(self) -> Result<LoopOutcome<E>, BridgeError> {
        match self.handle.join() {
            Ok(Some(outcome)) => Ok(outcome),
            Ok(None) => {
                log::error!("render thread exited without receiving the engine");
                Err(BridgeError::EngineUnavailable)
            }
            Err(_) => {
                log::error!("render thread panicked outside the step loop; engine lost");
                Err(BridgeError::EngineUnavailable)
            }
        }
    }
}

/// Runs the loop, turning an engine panic into a step failure so the engine
/// still reaches `deinit`.
fn run_guarded<E: Engine>(
    engine: &mut E,
    shared: &LoopShared,
    policy: StepErrorPolicy,
) -> Option<LoopFault> {
    match panic::catch_unwind(AssertUnwindSafe(|| run_loop(engine, shared, policy))) {
        Ok(fault) => fault,
        Err(payload) => {
            shared.step_failures.fetch_add(1, Ordering::Relaxed);
            let error = EngineError::from_panic(&*payload);
            log::error!("render loop aborted: {error}");
            Some((EngineCall::Step, error))
        }
    }
}

fn run_loop<E: Engine>(
    engine: &mut E,
    shared: &LoopShared,
    policy: StepErrorPolicy,
) -> Option<LoopFault> {
    // Every surface opens at 0x0. Steps use the size last handed to `resize`,
    // so the engine never sees a step size it was not resized to first.
    let mut applied = SurfaceSize::ZERO;
    let mut first_fault: Option<LoopFault> = None;
    let mut steps: u64 = 0;

    log::debug!("render loop started");

    // No pacing here: the engine's own swap/present blocks if it wants to.
    while shared.running.load(Ordering::Acquire) {
        // Resizes that land between two steps collapse into one with the
        // latest size.
        let resized = if shared.resize_pending.swap(false, Ordering::AcqRel) {
            let size = shared.size.load();
            applied = size;
            log::debug!("render loop resizing to {size}");
            engine
                .resize(size.width, size.height)
                .map_err(|e| (EngineCall::Resize, e))
        } else {
            Ok(())
        };

        let result = resized.and_then(|()| {
            let stepped = engine.step(applied.width, applied.height);
            steps += 1;
            shared.frames.fetch_add(1, Ordering::Relaxed);
            stepped.map_err(|e| (EngineCall::Step, e))
        });

        let Err((call, error)) = result else {
            continue;
        };

        let failures = shared.step_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if first_fault.is_none() {
            log::warn!("engine {call} failed on render thread: {error}");
            first_fault = Some((call, error));
        } else {
            log::trace!("engine {call} failed again ({failures} total): {error}");
        }

        if policy == StepErrorPolicy::Stop {
            log::warn!("render loop stopping after engine {call} failure");
            break;
        }
    }

    log::debug!("render loop exited after {steps} steps");
    first_fault
}
