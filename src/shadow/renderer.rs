use crate::blur::strategy::{BlurKind, BlurStrategy, PlatformBlur};
use crate::buffer::padding::pad_uniform;
use crate::buffer::pixel::PixelBuffer;
use crate::effects::composite::draw_scaled;
use crate::foundation::core::Rect;
use crate::foundation::error::ShadowResult;
use crate::shadow::cache::{CacheState, ShadowCache, ShadowCacheEntry, ValidFor};
use crate::shadow::config::ShadowConfig;
use crate::shadow::geometry::{ShadowGeometry, compositing_rect};

/// The host container a shadow is drawn behind.
///
/// The renderer never looks inside the container: it asks for a snapshot when the cache is
/// empty and otherwise only for the container's bounds.
pub trait Container {
    /// On-surface bounds of the container.
    fn bounds(&self) -> Rect;

    /// Measured size in pixels. May be zero or negative before layout.
    fn measured_size(&self) -> (i32, i32) {
        let b = self.bounds();
        (b.width().round() as i32, b.height().round() as i32)
    }

    /// Draw background and children into `buffer`, which is sized to [`Self::measured_size`]
    /// with the container's top-left at the origin.
    fn render_content_into(&mut self, buffer: &mut PixelBuffer);

    /// Draw the container's own content onto the surface, above the shadow.
    fn draw_content(&mut self, surface: &mut PixelBuffer);
}

/// Counters for cache behaviour across draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Completed pipeline runs.
    pub recomputes: u64,
    /// Draws served from the cache.
    pub cache_hits: u64,
    /// Draws that drew no shadow because the container was too small to snapshot.
    pub skipped_frames: u64,
}

/// Draws a cached soft shadow under a [`Container`], recomputing it only when the cache is
/// empty.
#[derive(Debug)]
pub struct ShadowRenderer {
    config: ShadowConfig,
    strategy: BlurStrategy,
    cache: ShadowCache,
    stats: RenderStats,
}

impl ShadowRenderer {
    /// Renderer using the default implementation of the configured blur kind.
    pub fn new(config: ShadowConfig) -> Self {
        let strategy = BlurStrategy::for_kind(config.blur_strategy());
        Self::with_strategy(config, strategy)
    }

    /// Renderer using a host blur service when the configuration selects the platform kind.
    /// A stack-blur configuration ignores `service`.
    pub fn with_platform_blur(config: ShadowConfig, service: impl PlatformBlur + 'static) -> Self {
        let strategy = match config.blur_strategy() {
            BlurKind::PlatformNative => BlurStrategy::platform(service),
            kind => BlurStrategy::for_kind(kind),
        };
        Self::with_strategy(config, strategy)
    }

    fn with_strategy(config: ShadowConfig, strategy: BlurStrategy) -> Self {
        Self {
            config,
            strategy,
            cache: ShadowCache::new(),
            stats: RenderStats::default(),
        }
    }

    /// Active style.
    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    /// Current cache state.
    pub fn cache_state(&self) -> CacheState {
        self.cache.state()
    }

    /// The cached shadow image, if any.
    pub fn cached_shadow(&self) -> Option<&PixelBuffer> {
        self.cache.entry().map(ShadowCacheEntry::buffer)
    }

    /// Cache counters since construction.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Drop the cached shadow so the next draw recomputes it. Call after the container's
    /// content, size, or style changes.
    pub fn invalidate_shadow(&mut self) {
        self.cache.invalidate();
    }

    /// Release the cached shadow when the container leaves the rendering surface.
    pub fn on_detached(&mut self) {
        self.cache.on_detached();
    }

    /// Composite the shadow onto `surface`, then let the container draw its own content.
    ///
    /// A container too small to snapshot gets no shadow for this frame; that is not an error.
    /// Any other pipeline failure is returned after the container content has been drawn.
    #[tracing::instrument(level = "trace", skip_all, fields(state = ?self.cache.state()))]
    pub fn draw<C>(&mut self, container: &mut C, surface: &mut PixelBuffer) -> ShadowResult<()>
    where
        C: Container + ?Sized,
    {
        let config = self.config;
        let strategy = &self.strategy;
        let was_cached = self.cache.is_cached();

        let outcome = self
            .cache
            .ensure_valid(|| recompute_shadow(&mut *container, &config, strategy));

        let result = match outcome {
            Ok(entry) => {
                if was_cached {
                    self.stats.cache_hits += 1;
                } else {
                    self.stats.recomputes += 1;
                }
                let rect = compositing_rect(container.bounds(), config.offsets());
                draw_scaled(surface, entry.buffer(), rect, config.paint_alpha());
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                self.stats.skipped_frames += 1;
                tracing::debug!(error = %e, "skipping shadow for this frame");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "shadow recompute failed");
                Err(e)
            }
        };

        container.draw_content(surface);
        result
    }
}

/// Snapshot the container and run it through [`build_shadow_image`].
fn recompute_shadow<C>(
    container: &mut C,
    config: &ShadowConfig,
    strategy: &BlurStrategy,
) -> ShadowResult<ShadowCacheEntry>
where
    C: Container + ?Sized,
{
    let (width, height) = container.measured_size();
    let geometry = ShadowGeometry::compute(width, height, config)?;

    let mut snapshot = PixelBuffer::new(geometry.container_width, geometry.container_height)?;
    container.render_content_into(&mut snapshot);

    let shadow = build_shadow_image(snapshot, &geometry, strategy)?;
    Ok(ShadowCacheEntry::new(
        shadow,
        ValidFor {
            container_width: geometry.container_width,
            container_height: geometry.container_height,
            config: *config,
        },
    ))
}

/// Downscale, pad, blur, and upscale a content snapshot into the final shadow image.
///
/// The result is always `geometry.final_width x geometry.final_height`.
pub fn build_shadow_image(
    snapshot: PixelBuffer,
    geometry: &ShadowGeometry,
    strategy: &BlurStrategy,
) -> ShadowResult<PixelBuffer> {
    let downscaled = snapshot.scaled(geometry.downscaled_width, geometry.downscaled_height, false)?;
    drop(snapshot);
    tracing::trace!(
        w = downscaled.width(),
        h = downscaled.height(),
        "downscaled"
    );

    let padded = pad_uniform(downscaled, geometry.downscale_padding)?;
    tracing::trace!(w = padded.width(), h = padded.height(), "padded");

    let blurred = strategy.blur(padded, geometry.effective_radius)?;
    tracing::trace!(radius = geometry.effective_radius, kind = ?strategy.kind(), "blurred");

    blurred.scaled(geometry.final_width, geometry.final_height, true)
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/renderer.rs"]
mod tests;
