use anyhow::{Context, Result};
use hearth_bridge::{Bridge, DrawableHandle, Phase, StepMode, SurfaceEvent};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::DemoConfig;
use crate::engine::DemoEngine;

/// Runs the demo until the window closes.
pub fn run(config: DemoConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut host = Host::new(config);

    event_loop
        .run_app(&mut host)
        .context("winit event loop terminated with error")?;

    Ok(())
}

/// Translates winit window lifecycle into bridge events.
///
/// `resumed` opens the surface, `suspended`/close tears it down. The window is
/// dropped only after the bridge has fully drained, so the engine never sees a
/// dangling handle.
struct Host {
    config: DemoConfig,
    bridge: Bridge<DemoEngine>,
    window: Option<Window>,
    exit_requested: bool,
}

impl Host {
    fn new(config: DemoConfig) -> Self {
        let engine = DemoEngine::new(config.target_fps, config.fail_after);
        let bridge = Bridge::new(config.bridge.clone(), engine);
        Self {
            config,
            bridge,
            window: None,
            exit_requested: false,
        }
    }

    fn host_driven(&self) -> bool {
        self.bridge.config().mode == StepMode::HostDriven
    }

    /// Forwards one event. Failures are reported here; the bridge has already
    /// completed whatever transition it could.
    fn dispatch(&mut self, event: SurfaceEvent) {
        let kind = event.kind();
        if let Err(e) = self.bridge.handle(event) {
            log::error!("{kind}: {:#}", anyhow::Error::new(e));
        }
    }

    fn open_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.config.initial_size;
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(w, h));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let surface = DrawableHandle::from_host(&window).context("window exposes no raw handle")?;
        let size = window.inner_size();
        self.window = Some(window);

        // A failed init still leaves the surface open; close tears it down.
        self.dispatch(SurfaceEvent::Available(surface));
        if self.bridge.phase() == Phase::Active {
            self.dispatch(SurfaceEvent::Resized {
                width: size.width,
                height: size.height,
            });
        }

        if self.host_driven() {
            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }
        Ok(())
    }

    /// Delivers surface-gone until the bridge is idle, then drops the window.
    fn close_surface(&mut self) {
        if self.bridge.phase() != Phase::Idle {
            self.dispatch(SurfaceEvent::Gone);
            while self.bridge.phase() == Phase::Stopping {
                log::warn!("render thread still draining; waiting again");
                self.dispatch(SurfaceEvent::Gone);
            }
        }
        self.window = None;
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.close_surface();
        self.exit_requested = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
        if let Err(e) = self.open_surface(event_loop) {
            log::error!("failed to open surface: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // Mobile platforms destroy the native surface while suspended.
        log::info!("suspended; releasing surface");
        self.close_surface();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Host-driven: one frame per redraw, redraw continuously.
        if self.host_driven() {
            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(Window::id) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.request_exit(event_loop),

            WindowEvent::Resized(size) if self.bridge.phase() == Phase::Active => {
                self.dispatch(SurfaceEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::RedrawRequested if self.host_driven() => {
                self.dispatch(SurfaceEvent::FrameTick);
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.close_surface();
    }
}
