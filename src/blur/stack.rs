//! Stack blur: a two-pass running-sum approximation of a Gaussian.
//!
//! Each pass slides a symmetric window of `2 * radius + 1` samples with triangular weights
//! (`radius + 1 - |d|`) over one axis. The weighted sum is maintained incrementally from an
//! "incoming" and an "outgoing" half-sum, so the cost per sample does not depend on the radius.
//! Reads past either end of a line repeat the edge sample.

use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::PremulRgba8;
use crate::foundation::math::div_round_u64;

/// CPU stack-blur engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackBlur;

impl StackBlur {
    /// Create the engine. It holds no state; scratch lines are allocated per call.
    pub fn new() -> Self {
        Self
    }

    /// Blur an owned buffer, reusing its storage for both passes.
    pub fn blur(&self, mut buffer: PixelBuffer, radius: u32) -> PixelBuffer {
        self.blur_in_place(&mut buffer, radius);
        buffer
    }

    /// Blur a borrowed buffer into a fresh one, leaving the caller's pixels untouched.
    pub fn blurred(&self, buffer: &PixelBuffer, radius: u32) -> PixelBuffer {
        self.blur(buffer.clone(), radius)
    }

    /// Horizontal pass then vertical pass, in place. `radius == 0` is a no-op.
    pub fn blur_in_place(&self, buffer: &mut PixelBuffer, radius: u32) {
        if radius == 0 {
            return;
        }
        let (w, h) = (buffer.width() as usize, buffer.height() as usize);
        let radius = radius as usize;
        let samples = buffer.samples_mut();

        let mut line = Vec::with_capacity(w.max(h));
        let mut out = vec![[0u8; 4]; w.max(h)];

        for row in samples.chunks_exact_mut(w) {
            line.clear();
            line.extend_from_slice(row);
            blur_line(&line, &mut out[..w], radius);
            row.copy_from_slice(&out[..w]);
        }

        for x in 0..w {
            line.clear();
            line.extend((0..h).map(|y| samples[y * w + x]));
            blur_line(&line, &mut out[..h], radius);
            for (y, px) in out[..h].iter().enumerate() {
                samples[y * w + x] = *px;
            }
        }
    }
}

fn blur_line(src: &[PremulRgba8], dst: &mut [PremulRgba8], radius: usize) {
    let last = src.len() as isize - 1;
    let at = |i: isize| -> PremulRgba8 { src[i.clamp(0, last) as usize] };
    let r = radius as isize;
    let div = (radius as u64 + 1).pow(2);

    let mut sum = [0u64; 4];
    let mut sum_in = [0u64; 4];
    let mut sum_out = [0u64; 4];
    for i in -r..=r {
        let p = at(i);
        let weight = (r + 1 - i.abs()) as u64;
        for c in 0..4 {
            let v = u64::from(p[c]);
            sum[c] += v * weight;
            if i <= 0 {
                sum_out[c] += v;
            } else {
                sum_in[c] += v;
            }
        }
    }

    for (x, out) in dst.iter_mut().enumerate() {
        for c in 0..4 {
            out[c] = div_round_u64(sum[c], div) as u8;
        }

        let x = x as isize;
        let incoming = at(x + r + 1);
        let leaving = at(x - r);
        let next = at(x + 1);
        for c in 0..4 {
            sum_in[c] += u64::from(incoming[c]);
            sum[c] = sum[c] - sum_out[c] + sum_in[c];
            sum_out[c] = sum_out[c] + u64::from(next[c]) - u64::from(leaving[c]);
            sum_in[c] -= u64::from(next[c]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blur/stack.rs"]
mod tests;
