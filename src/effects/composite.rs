use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::{PremulRgba8, Rect};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied source-over with an extra paint-level alpha applied to `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, alpha: u8) -> PremulRgba8 {
    if alpha == 0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(alpha);
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Stretch `src` into `dst_rect` on `surface` with bilinear filtering, blending source-over at
/// paint alpha `alpha`.
///
/// Pixels whose centres fall outside the surface are clipped. An empty or inverted rectangle
/// draws nothing.
pub fn draw_scaled(surface: &mut PixelBuffer, src: &PixelBuffer, dst_rect: Rect, alpha: u8) {
    let (rw, rh) = (dst_rect.width(), dst_rect.height());
    if alpha == 0 || !(rw > 0.0 && rh > 0.0) {
        return;
    }

    let x_start = (dst_rect.x0.round() as i64).max(0);
    let y_start = (dst_rect.y0.round() as i64).max(0);
    let x_end = (dst_rect.x1.round() as i64).min(i64::from(surface.width()));
    let y_end = (dst_rect.y1.round() as i64).min(i64::from(surface.height()));
    if x_start >= x_end || y_start >= y_end {
        return;
    }

    let sx = f64::from(src.width()) / rw;
    let sy = f64::from(src.height()) / rh;
    let surface_w = surface.width() as usize;
    let dst = surface.samples_mut();
    for y in y_start..y_end {
        let fy = ((y as f64 + 0.5 - dst_rect.y0) * sy - 0.5) as f32;
        let row = y as usize * surface_w;
        for x in x_start..x_end {
            let fx = ((x as f64 + 0.5 - dst_rect.x0) * sx - 0.5) as f32;
            let px = src.sample_bilinear(fx, fy);
            let i = row + x as usize;
            dst[i] = over(dst[i], px, alpha);
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
