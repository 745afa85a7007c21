use crate::blur::strategy::MIN_BLUR_RADIUS;
use crate::foundation::core::{Edges, Rect};
use crate::foundation::error::{ShadowError, ShadowResult};
use crate::shadow::config::ShadowConfig;

/// Buffer sizes and radii for one recompute of the shadow image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowGeometry {
    /// Measured container width (snapshot width).
    pub container_width: u32,
    /// Measured container height (snapshot height).
    pub container_height: u32,
    /// Snapshot width after integer downscaling.
    pub downscaled_width: u32,
    /// Snapshot height after integer downscaling.
    pub downscaled_height: u32,
    /// Transparent margin added on every side of the downscaled snapshot.
    pub downscale_padding: u32,
    /// Radius handed to the blur strategy, never below `MIN_BLUR_RADIUS`.
    pub effective_radius: u32,
    /// Width of the final, upscaled shadow image.
    pub final_width: u32,
    /// Height of the final, upscaled shadow image.
    pub final_height: u32,
}

impl ShadowGeometry {
    /// Derive the pipeline sizes for a container measured at `width x height`.
    ///
    /// Returns [`ShadowError::InvalidDimension`] when the container is not laid out yet
    /// (a side `<= 0`) or when downscaling would collapse a side to zero. Both are per-frame
    /// conditions the renderer skips rather than reports.
    pub fn compute(width: i32, height: i32, config: &ShadowConfig) -> ShadowResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ShadowError::invalid_dimension(width, height));
        }
        let (container_width, container_height) = (width as u32, height as u32);

        let rate = config.downscale_rate();
        let downscaled_width = container_width / rate;
        let downscaled_height = container_height / rate;
        if downscaled_width == 0 || downscaled_height == 0 {
            return Err(ShadowError::invalid_dimension(
                downscaled_width,
                downscaled_height,
            ));
        }

        let radius = config.blur_radius();
        let downscale_padding = radius / rate;
        let effective_radius = downscale_padding.max(MIN_BLUR_RADIUS);

        let grow = |side: u32| {
            radius
                .checked_mul(2)
                .and_then(|r2| side.checked_add(r2))
                .ok_or_else(|| ShadowError::Other(anyhow::anyhow!("shadow size overflows u32")))
        };

        Ok(Self {
            container_width,
            container_height,
            downscaled_width,
            downscaled_height,
            downscale_padding,
            effective_radius,
            final_width: grow(container_width)?,
            final_height: grow(container_height)?,
        })
    }

    /// Width of the padded, pre-blur buffer.
    pub fn padded_width(&self) -> u32 {
        self.downscaled_width + 2 * self.downscale_padding
    }

    /// Height of the padded, pre-blur buffer.
    pub fn padded_height(&self) -> u32 {
        self.downscaled_height + 2 * self.downscale_padding
    }
}

/// On-surface rectangle the cached shadow is stretched into: the container bounds grown by
/// `offsets` (left/top subtract, right/bottom add).
pub fn compositing_rect(container: Rect, offsets: Edges) -> Rect {
    offsets.outset_rect(container)
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/geometry.rs"]
mod tests;
