pub use kurbo::{Point, Rect, Size};

/// One premultiplied RGBA8 sample, `[r, g, b, a]`.
pub type PremulRgba8 = [u8; 4];

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Convert back to straight alpha. Fully transparent pixels become transparent black.
    pub fn to_straight_rgba(self) -> [u8; 4] {
        if self.a == 0 {
            return [0, 0, 0, 0];
        }
        let a = u32::from(self.a);
        let unpremul = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
        [unpremul(self.r), unpremul(self.g), unpremul(self.b), self.a]
    }

    /// Raw sample layout used by [`crate::PixelBuffer`].
    pub fn to_array(self) -> PremulRgba8 {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from a raw premultiplied sample.
    pub fn from_array([r, g, b, a]: PremulRgba8) -> Self {
        Self { r, g, b, a }
    }
}

/// Per-side pixel amounts (shadow offsets, padding insets).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    /// Left side.
    #[serde(default)]
    pub left: u32,
    /// Right side.
    #[serde(default)]
    pub right: u32,
    /// Top side.
    #[serde(default)]
    pub top: u32,
    /// Bottom side.
    #[serde(default)]
    pub bottom: u32,
}

impl Edges {
    /// Same amount on every side.
    pub fn uniform(v: u32) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }

    /// Return `true` when every side is zero.
    pub fn is_zero(self) -> bool {
        self.left == 0 && self.right == 0 && self.top == 0 && self.bottom == 0
    }

    /// Side-wise saturating sum.
    pub fn grow(self, other: Edges) -> Self {
        Self {
            left: self.left.saturating_add(other.left),
            right: self.right.saturating_add(other.right),
            top: self.top.saturating_add(other.top),
            bottom: self.bottom.saturating_add(other.bottom),
        }
    }

    /// Expand `rect` outward: left/top move by `-left`/`-top`, right/bottom by `+right`/`+bottom`.
    pub fn outset_rect(self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 - f64::from(self.left),
            rect.y0 - f64::from(self.top),
            rect.x1 + f64::from(self.right),
            rect.y1 + f64::from(self.bottom),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
