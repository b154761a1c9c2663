use raw_window_handle::{
    HandleError, HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle,
};

/// Reference to a host-owned rendering target.
///
/// Only valid between the host's surface-available and surface-gone
/// notifications. The bridge passes it to `Engine::init` and keeps no copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableHandle {
    window: RawWindowHandle,
    display: RawDisplayHandle,
}

impl DrawableHandle {
    pub fn new(window: RawWindowHandle, display: RawDisplayHandle) -> Self {
        Self { window, display }
    }

    /// Captures the raw handles of a live host window.
    pub fn from_host<H>(host: &H) -> Result<Self, HandleError>
    where
        H: HasWindowHandle + HasDisplayHandle + ?Sized,
    {
        let window = host.window_handle()?.as_raw();
        let display = host.display_handle()?.as_raw();
        Ok(Self { window, display })
    }

    pub fn window(&self) -> RawWindowHandle {
        self.window
    }

    pub fn display(&self) -> RawDisplayHandle {
        self.display
    }

    /// Short platform label for diagnostics ("xlib", "wayland", "android", ...).
    pub fn platform(&self) -> &'static str {
        match self.window {
            RawWindowHandle::UiKit(_) => "uikit",
            RawWindowHandle::AppKit(_) => "appkit",
            RawWindowHandle::Orbital(_) => "orbital",
            RawWindowHandle::Xlib(_) => "xlib",
            RawWindowHandle::Xcb(_) => "xcb",
            RawWindowHandle::Wayland(_) => "wayland",
            RawWindowHandle::Drm(_) => "drm",
            RawWindowHandle::Gbm(_) => "gbm",
            RawWindowHandle::Win32(_) => "win32",
            RawWindowHandle::WinRt(_) => "winrt",
            RawWindowHandle::Web(_) => "web",
            RawWindowHandle::WebCanvas(_) => "web-canvas",
            RawWindowHandle::WebOffscreenCanvas(_) => "web-offscreen-canvas",
            RawWindowHandle::AndroidNdk(_) => "android",
            RawWindowHandle::Haiku(_) => "haiku",
            _ => "unknown",
        }
    }
}
