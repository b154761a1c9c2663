use std::thread;
use std::time::{Duration, Instant};

/// Timing of one paced frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped.
    pub dt: f32,
    pub frame_index: u64,
}

/// Frame pacer for an engine stepped by an unpaced loop.
///
/// The bridge's render thread calls `step` back-to-back; the engine decides how
/// fast frames actually go. With a target rate, [`FramePacer::pace`] sleeps
/// until the next frame deadline. Deadlines advance by a fixed interval, so
/// short frames do not drift; a late frame restarts the schedule instead of
/// bursting to catch up.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    deadline: Instant,
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl FramePacer {
    pub fn new(target_fps: Option<u32>) -> Self {
        let now = Instant::now();
        Self {
            interval: target_fps
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_secs(1) / fps),
            deadline: now,
            last: now,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Restarts timing, e.g. when a new surface opens.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.deadline = now;
        self.last = now;
    }

    /// Sleeps until the next deadline (if paced) and returns the frame timing.
    pub fn pace(&mut self) -> FrameTime {
        let delay = self.next_delay(Instant::now());
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.tick_at(Instant::now())
    }

    fn next_delay(&mut self, now: Instant) -> Duration {
        let Some(interval) = self.interval else {
            return Duration::ZERO;
        };

        if now >= self.deadline {
            self.deadline = now + interval;
            return Duration::ZERO;
        }

        let delay = self.deadline - now;
        self.deadline += interval;
        delay
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).min(self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}
