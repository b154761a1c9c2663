use std::fmt;

use crate::surface::DrawableHandle;

/// Surface lifecycle notification delivered by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The drawable became valid. Opens a surface lifetime.
    Available(DrawableHandle),
    /// The drawable changed size.
    Resized { width: u32, height: u32 },
    /// The drawable is about to be invalidated. Closes the surface lifetime;
    /// the bridge has stopped using the handle when `handle` returns.
    Gone,
    /// One frame callback from the host (host-driven mode only).
    FrameTick,
}

impl SurfaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Available(_) => EventKind::Available,
            Self::Resized { .. } => EventKind::Resized,
            Self::Gone => EventKind::Gone,
            Self::FrameTick => EventKind::FrameTick,
        }
    }
}

/// Payload-free discriminant of [`SurfaceEvent`], used in error reports.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Available,
    Resized,
    Gone,
    FrameTick,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Available => "surface-available",
            Self::Resized => "surface-resized",
            Self::Gone => "surface-gone",
            Self::FrameTick => "frame-tick",
        })
    }
}

/// Lifecycle phase of a bridge.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    /// No engine state, no render thread.
    Idle,
    /// Engine state exists; in self-driven mode the render thread is stepping.
    Active,
    /// Stop was requested and the render thread has not been joined yet.
    Stopping,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Stopping => "stopping",
        })
    }
}
