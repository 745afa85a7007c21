use super::*;
use crate::foundation::core::Rgba8Premul;

fn dot(w: u32, h: u32, x: u32, y: u32) -> PixelBuffer {
    let mut b = PixelBuffer::new(w, h).unwrap();
    b.set_pixel(x, y, [255, 255, 255, 255]);
    b
}

/// Direct triangular-kernel convolution with edge clamping, one axis at a time.
fn reference_blur(src: &PixelBuffer, radius: usize) -> PixelBuffer {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let r = radius as isize;
    let div = (radius as u64 + 1).pow(2);
    let conv = |get: &dyn Fn(isize) -> PremulRgba8| -> PremulRgba8 {
        let mut acc = [0u64; 4];
        for d in -r..=r {
            let p = get(d);
            let wgt = (r + 1 - d.abs()) as u64;
            for c in 0..4 {
                acc[c] += u64::from(p[c]) * wgt;
            }
        }
        acc.map(|v| ((v + div / 2) / div) as u8)
    };

    let mut tmp = src.clone();
    for y in 0..h {
        for x in 0..w {
            let get = |d: isize| {
                let sx = (x as isize + d).clamp(0, w as isize - 1) as usize;
                src.samples()[y * w + sx]
            };
            tmp.samples_mut()[y * w + x] = conv(&get);
        }
    }
    let mut out = tmp.clone();
    for y in 0..h {
        for x in 0..w {
            let get = |d: isize| {
                let sy = (y as isize + d).clamp(0, h as isize - 1) as usize;
                tmp.samples()[sy * w + x]
            };
            out.samples_mut()[y * w + x] = conv(&get);
        }
    }
    out
}

#[test]
fn blur_radius_0_is_identity() {
    let src = dot(5, 4, 2, 1);
    assert_eq!(StackBlur.blurred(&src, 0), src);
    assert_eq!(StackBlur.blur(src.clone(), 0), src);
}

#[test]
fn blur_constant_image_is_identity() {
    let c = Rgba8Premul::from_straight_rgba(90, 160, 30, 200);
    for radius in [1u32, 2, 7, 40] {
        let src = PixelBuffer::filled(6, 4, c).unwrap();
        let out = StackBlur.blur(src.clone(), radius);
        assert_eq!(out, src, "radius {radius}");
    }
}

#[test]
fn running_sum_matches_direct_convolution() {
    let (w, h) = (9u32, 7u32);
    let samples = (0..w * h)
        .map(|i| {
            let a = ((i * 37) % 256) as u8;
            [a / 2, a / 3, a, a]
        })
        .collect();
    let src = PixelBuffer::from_samples(w, h, samples).unwrap();
    for radius in [1usize, 2, 3, 6, 12] {
        let fast = StackBlur.blurred(&src, radius as u32);
        let slow = reference_blur(&src, radius);
        assert_eq!(fast, slow, "radius {radius}");
    }
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let src = dot(11, 11, 5, 5);
    let out = StackBlur.blur(src, 2);

    let nonzero = out.samples().iter().filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));

    let sum_a: u32 = out.samples().iter().map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 12, "sum_a={sum_a}");
}

#[test]
fn blurred_leaves_source_untouched() {
    let src = dot(6, 6, 3, 3);
    let snapshot = src.clone();
    let out = StackBlur.blurred(&src, 3);
    assert_eq!(src, snapshot);
    assert_ne!(out, src);
}

#[test]
fn blur_keeps_premultiplied_invariant() {
    let samples = (0..64u32)
        .map(|i| {
            let a = ((i * 53) % 256) as u8;
            [a, a / 2, a / 4, a]
        })
        .collect();
    let out = StackBlur.blur(PixelBuffer::from_samples(8, 8, samples).unwrap(), 3);
    assert!(out.samples().iter().all(|p| p[0] <= p[3] && p[1] <= p[3]));
}
