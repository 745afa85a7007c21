use crate::buffer::pixel::PixelBuffer;
use crate::foundation::error::ShadowResult;
use crate::shadow::config::ShadowConfig;

/// Observable cache state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
    /// No shadow image; the next draw recomputes.
    Empty,
    /// A shadow image is stored and reused by every draw.
    Cached,
}

/// Inputs a cached shadow image was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidFor {
    /// Container width at capture time.
    pub container_width: u32,
    /// Container height at capture time.
    pub container_height: u32,
    /// Style used for the recompute.
    pub config: ShadowConfig,
}

/// A computed shadow image together with what it was computed for.
#[derive(Debug)]
pub struct ShadowCacheEntry {
    buffer: PixelBuffer,
    valid_for: ValidFor,
}

impl ShadowCacheEntry {
    /// Bundle a finished shadow image with its inputs.
    pub fn new(buffer: PixelBuffer, valid_for: ValidFor) -> Self {
        Self { buffer, valid_for }
    }

    /// The upscaled shadow image.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Inputs of the recompute.
    pub fn valid_for(&self) -> ValidFor {
        self.valid_for
    }
}

/// Holds at most one shadow image.
///
/// `Empty --draw--> Cached`, `Cached --draw--> Cached` (reuse), `Cached --invalidate/detach-->
/// Empty`, `Empty --invalidate/detach--> Empty`. Nothing else moves the state: resizes and style
/// changes must be followed by an explicit [`ShadowCache::invalidate`] from the host.
/// Dropping the entry is the single point where its pixels are released.
#[derive(Debug, Default)]
pub struct ShadowCache {
    entry: Option<ShadowCacheEntry>,
}

impl ShadowCache {
    /// New cache in the `Empty` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CacheState {
        match self.entry {
            Some(_) => CacheState::Cached,
            None => CacheState::Empty,
        }
    }

    /// Return `true` in the `Cached` state.
    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }

    /// The stored entry, if any.
    pub fn entry(&self) -> Option<&ShadowCacheEntry> {
        self.entry.as_ref()
    }

    /// Return the stored shadow, running `recompute` first when the cache is empty.
    ///
    /// A failed recompute leaves the cache `Empty`, so the next call tries again.
    pub fn ensure_valid<F>(&mut self, recompute: F) -> ShadowResult<&ShadowCacheEntry>
    where
        F: FnOnce() -> ShadowResult<ShadowCacheEntry>,
    {
        let entry = match self.entry.take() {
            Some(entry) => entry,
            None => {
                let entry = recompute()?;
                tracing::debug!(
                    width = entry.buffer.width(),
                    height = entry.buffer.height(),
                    "shadow cache filled"
                );
                entry
            }
        };
        Ok(self.entry.insert(entry))
    }

    /// Discard the stored shadow. Returns `true` when something was released.
    pub fn invalidate(&mut self) -> bool {
        let released = self.entry.take().is_some();
        if released {
            tracing::debug!("shadow cache invalidated");
        }
        released
    }

    /// Detach from the rendering surface: same transition as [`Self::invalidate`].
    pub fn on_detached(&mut self) -> bool {
        self.invalidate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/cache.rs"]
mod tests;
