use crate::blur::strategy::PlatformBlur;
use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::PremulRgba8;
use crate::foundation::error::{ShadowError, ShadowResult};

/// Separable Gaussian blur with a Q16 fixed-point kernel.
///
/// This is the bundled stand-in for a platform blur service: direct convolution, so cost grows
/// with the radius, which the platform strategy caps at 25.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianBlurService;

impl GaussianBlurService {
    /// Create the service.
    pub fn new() -> Self {
        Self
    }

    /// Standard deviation used for a given radius.
    pub fn sigma_for_radius(radius: u32) -> f32 {
        0.4 * radius as f32 + 0.6
    }
}

impl PlatformBlur for GaussianBlurService {
    fn blur(&self, buffer: PixelBuffer, radius: u32) -> ShadowResult<PixelBuffer> {
        if radius == 0 {
            return Ok(buffer);
        }
        let kernel = gaussian_kernel_q16(radius, Self::sigma_for_radius(radius))?;
        let (w, h) = (buffer.width(), buffer.height());

        let mut tmp = vec![[0u8; 4]; buffer.samples().len()];
        let mut out = buffer;
        horizontal_pass(out.samples(), &mut tmp, w, h, &kernel);
        vertical_pass(&tmp, out.samples_mut(), w, h, &kernel);
        Ok(out)
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ShadowResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ShadowError::invalid_config("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push the rounding residue into the centre tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[PremulRgba8], dst: &mut [PremulRgba8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let px = src[(y * w + sx) as usize];
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(px[c]);
                }
            }
            dst[(y * w + x) as usize] = acc.map(q16_to_u8);
        }
    }
}

fn vertical_pass(src: &[PremulRgba8], dst: &mut [PremulRgba8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let px = src[(sy * w + x) as usize];
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(px[c]);
                }
            }
            dst[(y * w + x) as usize] = acc.map(q16_to_u8);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/blur/gaussian.rs"]
mod tests;
