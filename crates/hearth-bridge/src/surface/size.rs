use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Surface dimensions in physical pixels.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const ZERO: Self = Self { width: 0, height: 0 };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    const fn pack(self) -> u64 {
        ((self.width as u64) << 32) | self.height as u64
    }

    const fn unpack(bits: u64) -> Self {
        Self {
            width: (bits >> 32) as u32,
            height: bits as u32,
        }
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Width/height pair shared with the render thread.
///
/// Both halves live in one `AtomicU64`, so a reader always sees a pair that
/// some writer stored as a whole.
#[derive(Debug, Default)]
pub(crate) struct SharedSize {
    bits: AtomicU64,
}

impl SharedSize {
    pub(crate) fn store(&self, size: SurfaceSize) {
        self.bits.store(size.pack(), Ordering::Release);
    }

    pub(crate) fn load(&self) -> SurfaceSize {
        SurfaceSize::unpack(self.bits.load(Ordering::Acquire))
    }
}
