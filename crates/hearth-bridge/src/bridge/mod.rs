//! Surface lifecycle bridge.
//!
//! [`Bridge`] consumes [`SurfaceEvent`]s from the host and sequences the
//! engine through one surface lifetime at a time:
//!
//! ```text
//! Idle --Available--> Active --Gone--> (Stopping) --> Idle
//!                       |  ^
//!                       +--+ Resized / FrameTick
//! ```
//!
//! In self-driven mode the engine lives on a render thread while `Active`;
//! surface-gone clears the running flag, joins the thread, and only then calls
//! `deinit`.

mod config;
mod error;
mod event;
mod render_thread;


use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::engine::{Engine, EngineCall};
use crate::surface::{DrawableHandle, SurfaceSize};

use render_thread::{LoopFault, LoopShared, RenderThread};

pub use config::{BridgeConfig, StepErrorPolicy, StepMode};
pub use error::BridgeError;
pub use event::{EventKind, Phase, SurfaceEvent};

/// Counters for diagnostics and tests.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BridgeStats {
    /// Surface lifetimes opened so far.
    pub windows_opened: u64,
    /// `step` calls made, failed ones included, across all surfaces.
    pub frames_stepped: u64,
    /// Failed `step`/`resize` calls, across all surfaces.
    pub step_failures: u64,
    /// Whether a render thread is currently alive.
    pub render_thread_running: bool,
}

/// Drives an [`Engine`] from host surface lifecycle events.
pub struct Bridge<E>
where
    E: Engine + Send + 'static,
{
    config: BridgeConfig,
    phase: Phase,

    /// Present whenever the engine is not lent to the render thread.
    engine: Option<E>,
    render: Option<RenderThread<E>>,
    shared: Arc<LoopShared>,

    /// Init failed for the current surface; no resize/step until it closes.
    init_failed: bool,
    /// Host-driven stop policy tripped for the current surface.
    halted: bool,
    windows_opened: u64,
}

impl<E> Bridge<E>
where
    E: Engine + Send + 'static,
{
    /// Creates an idle bridge. The engine library must already be loaded.
    pub fn new(config: BridgeConfig, engine: E) -> Self {
        log::debug!(
            "bridge created ({:?}, on_step_error={:?}, teardown_timeout={:?})",
            config.mode,
            config.on_step_error,
            config.teardown_timeout
        );

        Self {
            config,
            phase: Phase::Idle,
            engine: Some(engine),
            render: None,
            shared: Arc::new(LoopShared::default()),
            init_failed: false,
            halted: false,
            windows_opened: 0,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Last size delivered by the host for the current surface.
    pub fn size(&self) -> SurfaceSize {
        self.shared.size.load()
    }

    pub fn stats(&self) -> BridgeStats {
        BridgeStats {
            windows_opened: self.windows_opened,
            frames_stepped: self.shared.frames.load(Ordering::Relaxed),
            step_failures: self.shared.step_failures.load(Ordering::Relaxed),
            render_thread_running: self.render.as_ref().is_some_and(|r| r.is_running()),
        }
    }

    /// Single entry point for host lifecycle events.
    ///
    /// Protocol violations leave the bridge untouched. Engine failures are
    /// reported after the transition they belong to has completed.
    pub fn handle(&mut self, event: SurfaceEvent) -> Result<(), BridgeError> {
        let result = match event {
            SurfaceEvent::Available(surface) => self.on_available(&surface),
            SurfaceEvent::Resized { width, height } => {
                self.on_resized(SurfaceSize::new(width, height))
            }
            SurfaceEvent::Gone => self.on_gone(),
            SurfaceEvent::FrameTick => self.on_frame_tick(),
        };

        if let Err(BridgeError::ProtocolViolation { event, phase }) = &result {
            log::warn!("rejected {event} while {phase}");
        }
        result
    }

    fn violation(&self, event: EventKind) -> BridgeError {
        BridgeError::ProtocolViolation {
            event,
            phase: self.phase,
        }
    }

    fn on_available(&mut self, surface: &DrawableHandle) -> Result<(), BridgeError> {
        if self.phase != Phase::Idle {
            return Err(self.violation(EventKind::Available));
        }
        let Some(mut engine) = self.engine.take() else {
            return Err(BridgeError::EngineUnavailable);
        };

        self.windows_opened += 1;
        self.init_failed = false;
        self.halted = false;
        self.shared.size.store(SurfaceSize::ZERO);
        self.shared.resize_pending.store(false, Ordering::Release);

        log::info!(
            "surface available ({}), window #{}",
            surface.platform(),
            self.windows_opened
        );

        let init = engine.init(surface);
        self.phase = Phase::Active;

        if let Err(source) = init {
            log::error!("engine init failed: {source}");
            self.init_failed = true;
            self.engine = Some(engine);
            return Err(BridgeError::engine(EngineCall::Init, source));
        }

        if self.config.mode == StepMode::HostDriven {
            self.engine = Some(engine);
            return Ok(());
        }

        match RenderThread::spawn(
            &self.config.thread_name,
            self.config.on_step_error,
            engine,
            &self.shared,
        ) {
            Ok(render) => {
                log::debug!("render thread '{}' started", self.config.thread_name);
                self.render = Some(render);
                Ok(())
            }
            Err((mut engine, e)) => {
                log::error!("failed to spawn render thread: {e}; tearing engine down");
                if let Err(deinit) = engine.deinit() {
                    log::error!("engine deinit after failed spawn also failed: {deinit}");
                }
                self.engine = Some(engine);
                self.phase = Phase::Idle;
                Err(BridgeError::ThreadSpawn(e))
            }
        }
    }

    fn on_resized(&mut self, size: SurfaceSize) -> Result<(), BridgeError> {
        if self.phase != Phase::Active {
            return Err(self.violation(EventKind::Resized));
        }

        self.shared.size.store(size);
        log::debug!("surface resized to {size}");

        if self.init_failed {
            return Ok(());
        }
        // Self-driven: the render loop resizes before its next step.
        if self.config.mode == StepMode::SelfDriven {
            self.shared.resize_pending.store(true, Ordering::Release);
            return Ok(());
        }

        let engine = self.engine.as_mut().ok_or(BridgeError::EngineUnavailable)?;
        engine.resize(size.width, size.height).map_err(|source| {
            log::error!("engine resize to {size} failed: {source}");
            BridgeError::engine(EngineCall::Resize, source)
        })
    }

    fn on_frame_tick(&mut self) -> Result<(), BridgeError> {
        if self.phase != Phase::Active || self.config.mode != StepMode::HostDriven {
            return Err(self.violation(EventKind::FrameTick));
        }
        if self.init_failed || self.halted {
            log::trace!("frame tick skipped");
            return Ok(());
        }

        let size = self.shared.size.load();
        let engine = self.engine.as_mut().ok_or(BridgeError::EngineUnavailable)?;
        let stepped = engine.step(size.width, size.height);
        self.shared.frames.fetch_add(1, Ordering::Relaxed);

        stepped.map_err(|source| {
            self.shared.step_failures.fetch_add(1, Ordering::Relaxed);
            if self.config.on_step_error == StepErrorPolicy::Stop {
                log::warn!("engine step failed: {source}; stepping halted for this surface");
                self.halted = true;
            } else {
                log::warn!("engine step failed: {source}");
            }
            BridgeError::engine(EngineCall::Step, source)
        })
    }

    fn on_gone(&mut self) -> Result<(), BridgeError> {
        if self.phase == Phase::Idle {
            log::debug!("surface-gone while idle ignored");
            return Ok(());
        }
        let timeout = self.config.teardown_timeout;
        self.teardown(timeout)
    }

    /// Drains the render thread (if any), then deinits the engine.
    ///
    /// Ends in `Idle` unless the bounded wait expires, in which case the
    /// bridge stays in `Stopping` with the thread handle kept.
    fn teardown(&mut self, timeout: Option<Duration>) -> Result<(), BridgeError> {
        let mut loop_fault: Option<LoopFault> = None;

        if let Some(render) = self.render.as_mut() {
            self.phase = Phase::Stopping;
            render.request_stop();

            if let Err(e) = render.wait_exit(timeout) {
                log::error!("{e}; surface teardown incomplete");
                return Err(e);
            }
        }

        if let Some(render) = self.render.take() {
            match render.join() {
                Ok(outcome) => {
                    self.engine = Some(outcome.engine);
                    loop_fault = outcome.fault;
                }
                Err(e) => {
                    self.phase = Phase::Idle;
                    return Err(e);
                }
            }
            log::debug!("render thread joined");
        }

        let deinit = match self.engine.as_mut() {
            Some(engine) => engine.deinit(),
            None => Ok(()),
        };
        self.phase = Phase::Idle;
        log::info!("surface gone, engine deinitialized");

        match (deinit, loop_fault) {
            (Err(source), fault) => {
                if let Some((call, error)) = fault {
                    log::error!("engine {call} failed on render thread: {error}");
                }
                log::error!("engine deinit failed: {source}");
                Err(BridgeError::engine(EngineCall::Deinit, source))
            }
            (Ok(()), Some((call, source))) => Err(BridgeError::engine(call, source)),
            (Ok(()), None) => Ok(()),
        }
    }
}

/// Dropping an open bridge blocks until the render thread has exited and
/// `deinit` has run, ignoring `teardown_timeout`: a detached thread would keep
/// using an engine nobody can deinit any more.
impl<E> Drop for Bridge<E>
where
    E: Engine + Send + 'static,
{
    fn drop(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }

        log::warn!("bridge dropped while {}; tearing surface down", self.phase);
        if let Err(e) = self.teardown(None) {
            log::error!("teardown on drop: {e}");
        }
    }
}
