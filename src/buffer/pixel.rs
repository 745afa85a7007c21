use crate::foundation::core::{PremulRgba8, Rgba8Premul};
use crate::foundation::error::{ShadowError, ShadowResult};
use crate::foundation::math::lerp_f32;

/// Owned rectangular grid of premultiplied RGBA8 samples, row-major.
///
/// `samples().len() == width * height` always holds, and both sides are non-zero. Every pipeline
/// stage takes a buffer by value and hands back an owned buffer, so pixel storage is never shared
/// between stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<PremulRgba8>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> ShadowResult<Self> {
        Self::filled(width, height, Rgba8Premul::transparent())
    }

    /// Allocate a buffer with every sample set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> ShadowResult<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            samples: vec![color.to_array(); len],
        })
    }

    /// Wrap existing premultiplied samples.
    pub fn from_samples(width: u32, height: u32, samples: Vec<PremulRgba8>) -> ShadowResult<Self> {
        let len = checked_len(width, height)?;
        if samples.len() != len {
            return Err(ShadowError::Other(anyhow::anyhow!(
                "sample count {} does not match {width}x{height}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build from tightly packed straight-alpha RGBA8 bytes, premultiplying on the way in.
    pub fn from_rgba8_straight(width: u32, height: u32, bytes: &[u8]) -> ShadowResult<Self> {
        let len = checked_len(width, height)?;
        if bytes.len() != len.saturating_mul(4) {
            return Err(ShadowError::Other(anyhow::anyhow!(
                "expected {} rgba8 bytes for {width}x{height}, got {}",
                len.saturating_mul(4),
                bytes.len()
            )));
        }
        let samples = bytes
            .chunks_exact(4)
            .map(|px| Rgba8Premul::from_straight_rgba(px[0], px[1], px[2], px[3]).to_array())
            .collect();
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Convert a decoded image into a premultiplied buffer.
    pub fn from_image(img: &image::DynamicImage) -> ShadowResult<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8_straight(width, height, rgba.as_raw())
    }

    /// Un-premultiply into an `image` buffer for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut raw = Vec::with_capacity(self.samples.len() * 4);
        for &px in &self.samples {
            raw.extend_from_slice(&Rgba8Premul::from_array(px).to_straight_rgba());
        }
        image::RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All samples, row-major.
    pub fn samples(&self) -> &[PremulRgba8] {
        &self.samples
    }

    /// Mutable access to all samples, row-major.
    pub fn samples_mut(&mut self) -> &mut [PremulRgba8] {
        &mut self.samples
    }

    /// Sample at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.samples[self.index(x, y)])
    }

    /// Overwrite the sample at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: PremulRgba8) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.samples[i] = px;
        }
    }

    /// Set every sample to `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        self.samples.fill(color.to_array());
    }

    /// Write `source` into this buffer with its top-left corner at `(draw_x, draw_y)`.
    ///
    /// Samples are replaced, not blended. Parts of `source` falling outside this buffer are
    /// clipped silently.
    pub fn copy_from(&mut self, source: &PixelBuffer, draw_x: i32, draw_y: i32) {
        let dst_w = i64::from(self.width);
        let dst_h = i64::from(self.height);
        let x0 = i64::from(draw_x).max(0);
        let y0 = i64::from(draw_y).max(0);
        let x1 = (i64::from(draw_x) + i64::from(source.width)).min(dst_w);
        let y1 = (i64::from(draw_y) + i64::from(source.height)).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let span = (x1 - x0) as usize;
        for y in y0..y1 {
            let sy = (y - i64::from(draw_y)) as usize;
            let sx = (x0 - i64::from(draw_x)) as usize;
            let src_start = sy * source.width as usize + sx;
            let dst_start = y as usize * self.width as usize + x0 as usize;
            self.samples[dst_start..dst_start + span]
                .copy_from_slice(&source.samples[src_start..src_start + span]);
        }
    }

    /// Resample into a new `new_width x new_height` buffer.
    ///
    /// `smooth = false` uses nearest-neighbour (cheap, used for downscaling before the blur);
    /// `smooth = true` uses bilinear filtering (used for the final upscale).
    pub fn scaled(&self, new_width: u32, new_height: u32, smooth: bool) -> ShadowResult<Self> {
        let mut out = Self::new(new_width, new_height)?;
        if new_width == self.width && new_height == self.height {
            out.samples.copy_from_slice(&self.samples);
            return Ok(out);
        }

        let sx = self.width as f32 / new_width as f32;
        let sy = self.height as f32 / new_height as f32;
        for y in 0..new_height {
            for x in 0..new_width {
                let px = if smooth {
                    self.sample_bilinear(
                        (x as f32 + 0.5) * sx - 0.5,
                        (y as f32 + 0.5) * sy - 0.5,
                    )
                } else {
                    self.sample_nearest(x, new_width, y, new_height)
                };
                let i = out.index(x, y);
                out.samples[i] = px;
            }
        }
        Ok(out)
    }

    /// Nearest-neighbour lookup of destination pixel `(x, y)` in a `dst_w x dst_h` target.
    fn sample_nearest(&self, x: u32, dst_w: u32, y: u32, dst_h: u32) -> PremulRgba8 {
        // Map pixel centres with integer math: src = floor((2x + 1) * sw / (2 * dw)).
        let src_x = ((2 * u64::from(x) + 1) * u64::from(self.width) / (2 * u64::from(dst_w)))
            .min(u64::from(self.width - 1)) as u32;
        let src_y = ((2 * u64::from(y) + 1) * u64::from(self.height) / (2 * u64::from(dst_h)))
            .min(u64::from(self.height - 1)) as u32;
        self.samples[self.index(src_x, src_y)]
    }

    /// Bilinear sample at continuous source coordinates, clamped to the edge pixels.
    pub(crate) fn sample_bilinear(&self, fx: f32, fy: f32) -> PremulRgba8 {
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let fx = fx.clamp(0.0, max_x);
        let fy = fy.clamp(0.0, max_y);

        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let p00 = self.samples[self.index(x0, y0)];
        let p10 = self.samples[self.index(x1, y0)];
        let p01 = self.samples[self.index(x0, y1)];
        let p11 = self.samples[self.index(x1, y1)];

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = lerp_f32(f32::from(p00[c]), f32::from(p10[c]), tx);
            let bottom = lerp_f32(f32::from(p01[c]), f32::from(p11[c]), tx);
            out[c] = lerp_f32(top, bottom, ty).round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

fn checked_len(width: u32, height: u32) -> ShadowResult<usize> {
    if width == 0 || height == 0 {
        return Err(ShadowError::invalid_dimension(width, height));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| ShadowError::Other(anyhow::anyhow!("pixel buffer size overflow")))
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
