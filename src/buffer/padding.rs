use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::Edges;
use crate::foundation::error::{ShadowError, ShadowResult};

/// Grow `buffer` by transparent margins, copying the source to `(left, top)`.
///
/// When every inset is zero the input is handed back untouched without allocating.
pub fn pad(
    buffer: PixelBuffer,
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
) -> ShadowResult<PixelBuffer> {
    pad_edges(
        buffer,
        Edges {
            left,
            right,
            top,
            bottom,
        },
    )
}

/// Same margin on all four sides.
pub fn pad_uniform(buffer: PixelBuffer, padding: u32) -> ShadowResult<PixelBuffer> {
    pad_edges(buffer, Edges::uniform(padding))
}

/// [`pad`] with the insets bundled as [`Edges`].
pub fn pad_edges(buffer: PixelBuffer, insets: Edges) -> ShadowResult<PixelBuffer> {
    if insets.is_zero() {
        return Ok(buffer);
    }

    let width = grow_side(buffer.width(), insets.left, insets.right)?;
    let height = grow_side(buffer.height(), insets.top, insets.bottom)?;
    let (x, y) = (to_i32(insets.left)?, to_i32(insets.top)?);

    let mut out = PixelBuffer::new(width, height)?;
    out.copy_from(&buffer, x, y);
    Ok(out)
}

fn grow_side(side: u32, a: u32, b: u32) -> ShadowResult<u32> {
    side.checked_add(a)
        .and_then(|v| v.checked_add(b))
        .ok_or_else(|| ShadowError::Other(anyhow::anyhow!("padded size overflows u32")))
}

fn to_i32(v: u32) -> ShadowResult<i32> {
    i32::try_from(v).map_err(|_| ShadowError::Other(anyhow::anyhow!("padding {v} exceeds i32")))
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/padding.rs"]
mod tests;
