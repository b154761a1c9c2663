use std::time::{Duration, Instant};

use hearth_bridge::{DrawableHandle, Engine, EngineError, SurfaceSize};

use crate::pacing::FramePacer;

const REPORT_EVERY: Duration = Duration::from_secs(2);

/// Engine that "renders" by counting frames and logging a rate report.
///
/// It never touches the surface; it only records which platform handed it one.
pub struct DemoEngine {
    target_fps: Option<u32>,
    fail_after: Option<u64>,
    state: Option<SurfaceState>,
}

struct SurfaceState {
    platform: &'static str,
    size: SurfaceSize,
    pacer: FramePacer,
    frames: u64,
    report_start: Instant,
    report_frames: u32,
}

impl DemoEngine {
    pub fn new(target_fps: Option<u32>, fail_after: Option<u64>) -> Self {
        Self {
            target_fps,
            fail_after,
            state: None,
        }
    }

    fn state_mut(&mut self, call: &str) -> Result<&mut SurfaceState, EngineError> {
        self.state
            .as_mut()
            .ok_or_else(|| EngineError::new(format!("{call} before init")))
    }
}

impl Engine for DemoEngine {
    fn init(&mut self, surface: &DrawableHandle) -> Result<(), EngineError> {
        if self.state.is_some() {
            return Err(EngineError::new("init called twice without deinit"));
        }

        log::info!("demo engine bound to {} surface", surface.platform());
        self.state = Some(SurfaceState {
            platform: surface.platform(),
            size: SurfaceSize::ZERO,
            pacer: FramePacer::new(self.target_fps),
            frames: 0,
            report_start: Instant::now(),
            report_frames: 0,
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        let state = self.state_mut("resize")?;
        state.size = SurfaceSize::new(width, height);
        state.pacer.reset();
        log::debug!("demo engine viewport {}", state.size);
        Ok(())
    }

    fn step(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        let fail_after = self.fail_after;
        let state = self.state_mut("step")?;

        if fail_after.is_some_and(|limit| state.frames >= limit) {
            return Err(EngineError::new(format!(
                "simulated failure after {} frames",
                state.frames
            )));
        }

        let time = state.pacer.pace();
        if SurfaceSize::new(width, height).is_empty() {
            log::trace!("frame skipped, empty viewport");
            return Ok(());
        }
        state.frames += 1;
        state.report_frames += 1;
        log::trace!("frame {} at {width}x{height} (dt {:.4}s)", time.frame_index, time.dt);

        let elapsed = state.report_start.elapsed();
        if elapsed >= REPORT_EVERY {
            let fps = f64::from(state.report_frames) / elapsed.as_secs_f64();
            log::info!(
                "{} {width}x{height}: {fps:.1} fps ({} frames total)",
                state.platform,
                state.frames
            );
            state.report_start = Instant::now();
            state.report_frames = 0;
        }
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), EngineError> {
        match self.state.take() {
            Some(state) => {
                log::info!(
                    "demo engine released {} surface after {} frames",
                    state.platform,
                    state.frames
                );
                Ok(())
            }
            None => {
                // Deinit after a failed init is expected and harmless.
                log::debug!("demo engine deinit with no surface state");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_bridge::raw_window_handle::{
        RawDisplayHandle, RawWindowHandle, WebDisplayHandle, WebWindowHandle,
    };

    fn surface() -> DrawableHandle {
        DrawableHandle::new(
            RawWindowHandle::Web(WebWindowHandle::new(1)),
            RawDisplayHandle::Web(WebDisplayHandle::new()),
        )
    }

    #[test]
    fn calls_before_init_fail() {
        let mut e = DemoEngine::new(None, None);
        assert!(e.step(1, 1).is_err());
        assert!(e.resize(1, 1).is_err());
        assert!(e.deinit().is_ok());
    }

    #[test]
    fn double_init_is_refused() {
        let mut e = DemoEngine::new(None, None);
        e.init(&surface()).unwrap();
        assert!(e.init(&surface()).is_err());
        e.deinit().unwrap();
        e.init(&surface()).unwrap();
    }

    #[test]
    fn empty_viewport_frames_are_not_counted() {
        let mut e = DemoEngine::new(None, Some(1));
        e.init(&surface()).unwrap();
        e.step(0, 0).unwrap();
        e.step(640, 0).unwrap();
        e.step(8, 8).unwrap();
        assert!(e.step(8, 8).is_err());
        e.deinit().unwrap();
    }

    #[test]
    fn fails_after_configured_frames() {
        let mut e = DemoEngine::new(None, Some(3));
        e.init(&surface()).unwrap();
        for _ in 0..3 {
            e.step(8, 8).unwrap();
        }
        let err = e.step(8, 8).unwrap_err();
        assert!(err.message().contains("after 3 frames"));
        e.deinit().unwrap();
    }
}
