//! Hearth bridge crate.
//!
//! Sequences a host-owned drawable surface into a stepping render engine:
//! init on surface-available, resize/step while the surface lives, and a full
//! drain followed by deinit on surface-gone.

pub mod bridge;
pub mod engine;
pub mod surface;

pub mod logging;

pub use bridge::{
    Bridge, BridgeConfig, BridgeError, BridgeStats, EventKind, Phase, StepErrorPolicy, StepMode,
    SurfaceEvent,
};
pub use engine::{Engine, EngineCall, EngineError, EngineLibrary, LoadOutcome, ENGINE_LIBRARY};
pub use surface::{DrawableHandle, SurfaceSize};

pub use raw_window_handle;
