//! Host surface types.
//!
//! The bridge never owns a surface. It borrows a [`DrawableHandle`] for the
//! duration of the engine's `init` call and tracks the surface size in a form
//! the render thread can read without locking.

mod handle;
mod size;

pub use handle::DrawableHandle;
pub use size::SurfaceSize;

pub(crate) use size::SharedSize;
