use std::time::Duration;

/// Who calls `step`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepMode {
    /// The host delivers one `FrameTick` per frame; the bridge owns no thread.
    HostDriven,
    /// The bridge owns a render thread that steps back-to-back until the
    /// surface goes away.
    SelfDriven,
}

/// What the bridge does after a failed `step` (or render-thread `resize`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepErrorPolicy {
    /// Log, count, keep stepping.
    Continue,
    /// Stop stepping for the rest of the surface lifetime.
    Stop,
}

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub mode: StepMode,
    pub on_step_error: StepErrorPolicy,

    /// Upper bound on how long surface-gone waits for the render thread.
    ///
    /// `None` waits indefinitely. Dropping the bridge always waits without a
    /// bound, even when this is set.
    pub teardown_timeout: Option<Duration>,

    /// Name given to the render thread (self-driven mode). A name containing
    /// a NUL byte makes surface-available fail with `ThreadSpawn`.
    pub thread_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mode: StepMode::SelfDriven,
            on_step_error: StepErrorPolicy::Continue,
            teardown_timeout: None,
            thread_name: "hearth-render".to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn host_driven() -> Self {
        Self {
            mode: StepMode::HostDriven,
            ..Self::default()
        }
    }

    pub fn self_driven() -> Self {
        Self {
            mode: StepMode::SelfDriven,
            ..Self::default()
        }
    }

    pub fn on_step_error(mut self, policy: StepErrorPolicy) -> Self {
        self.on_step_error = policy;
        self
    }

    pub fn teardown_timeout(mut self, timeout: Duration) -> Self {
        self.teardown_timeout = Some(timeout);
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
