use parking_lot::Mutex;

use super::EngineError;

/// Result of [`EngineLibrary::load`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoadOutcome {
    /// The loader ran and succeeded on this call.
    Loaded,
    /// A previous call already loaded the library; the loader was not run.
    AlreadyLoaded,
}

/// One-time, process-wide engine library initialization.
///
/// Hosts load the engine library before constructing any bridge. Loading is
/// idempotent: once a loader has succeeded, further calls report
/// [`LoadOutcome::AlreadyLoaded`]. A failed loader leaves the library unloaded
/// so the next call can retry.
#[derive(Debug)]
pub struct EngineLibrary {
    name: &'static str,
    loaded: Mutex<bool>,
}

/// Library instance shared by the whole process.
pub static ENGINE_LIBRARY: EngineLibrary = EngineLibrary::new("engine");

impl EngineLibrary {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            loaded: parking_lot::const_mutex(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_loaded(&self) -> bool {
        *self.loaded.lock()
    }

    /// Runs `loader` unless the library is already loaded.
    ///
    /// Concurrent callers serialize on an internal lock, so the loader never
    /// runs twice.
    pub fn load<F>(&self, loader: F) -> Result<LoadOutcome, EngineError>
    where
        F: FnOnce() -> Result<(), EngineError>,
    {
        let mut loaded = self.loaded.lock();
        if *loaded {
            log::debug!("engine library '{}' already loaded", self.name);
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        if let Err(e) = loader() {
            log::error!("engine library '{}' failed to load: {e}", self.name);
            return Err(e);
        }

        *loaded = true;
        log::info!("engine library '{}' loaded", self.name);
        Ok(LoadOutcome::Loaded)
    }
}
