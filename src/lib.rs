//! softshadow renders soft drop-shadows behind UI containers on the CPU.
//!
//! A shadow is produced by snapshotting the container's rendered content into an offscreen
//! [`PixelBuffer`], shrinking it, padding it with transparent margins, blurring it, and
//! stretching the result back out. The image is cached and composited under the container on
//! every draw until the host invalidates it.
//!
//! # Pipeline overview
//!
//! 1. **Capture**: [`Container::render_content_into`] fills a buffer of the measured size
//! 2. **Downscale**: nearest-neighbour shrink by [`ShadowConfig::downscale_rate`]
//! 3. **Pad**: transparent margin of `blur_radius / downscale_rate` on every side
//! 4. **Blur**: [`BlurStrategy`] (stack blur, or a platform service capped at radius 25)
//! 5. **Upscale**: bilinear stretch to `container + 2 * blur_radius`
//! 6. **Composite**: source-over into the container bounds grown by the configured offsets
//!
//! Constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: a cache miss runs the whole pipeline inside the draw call.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod blur;
mod buffer;
mod effects;
mod foundation;
mod shadow;

pub use blur::gaussian::GaussianBlurService;
pub use blur::stack::StackBlur;
pub use blur::strategy::{BlurKind, BlurStrategy, MAX_BLUR_RADIUS, MIN_BLUR_RADIUS, PlatformBlur};
pub use buffer::padding::{pad, pad_edges, pad_uniform};
pub use buffer::pixel::PixelBuffer;
pub use effects::composite::{draw_scaled, over};
pub use foundation::core::{Edges, Point, PremulRgba8, Rect, Rgba8Premul, Size};
pub use foundation::error::{ShadowError, ShadowResult};
pub use shadow::cache::{CacheState, ShadowCache, ShadowCacheEntry, ValidFor};
pub use shadow::config::{
    DEFAULT_ALPHA_PERCENT, DEFAULT_BLUR_RADIUS, DEFAULT_DOWNSCALE_RATE, DEFAULT_OFFSET,
    ShadowConfig, ShadowConfigBuilder,
};
pub use shadow::geometry::{ShadowGeometry, compositing_rect};
pub use shadow::renderer::{Container, RenderStats, ShadowRenderer, build_shadow_image};
