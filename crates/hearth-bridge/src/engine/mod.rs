//! Engine contract.
//!
//! The engine is an opaque collaborator. The bridge only sequences calls into
//! it; what `init`, `resize`, `step` and `deinit` do with the surface is the
//! engine's business.

mod error;
mod library;

use std::fmt;

use crate::surface::DrawableHandle;

pub use error::EngineError;
pub use library::{EngineLibrary, LoadOutcome, ENGINE_LIBRARY};

/// Rendering engine driven by the bridge.
///
/// Call order within one surface lifetime is always
/// `init`, then any number of `resize`/`step`, then `deinit`. Calls are never
/// concurrent. In self-driven mode `resize` and `step` run on the render thread
/// while `init` and `deinit` run on the thread that delivers surface events,
/// hence the `Send` requirement at the bridge.
pub trait Engine {
    /// Creates engine state bound to `surface`.
    ///
    /// The handle is only valid for the duration of the surface lifetime; the
    /// engine must not use it after `deinit`.
    fn init(&mut self, surface: &DrawableHandle) -> Result<(), EngineError>;

    /// Called for every host resize, including to 0x0. In self-driven mode
    /// resizes that arrive between two steps reach the engine as one call with
    /// the latest size.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError>;

    /// Renders one frame. Expected to return promptly; a stop request is only
    /// observed between steps.
    fn step(&mut self, width: u32, height: u32) -> Result<(), EngineError>;

    /// Destroys the state created by `init`.
    fn deinit(&mut self) -> Result<(), EngineError>;
}

/// Identifies which engine call produced an error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EngineCall {
    Init,
    Resize,
    Step,
    Deinit,
}

impl EngineCall {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Resize => "resize",
            Self::Step => "step",
            Self::Deinit => "deinit",
        }
    }
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
