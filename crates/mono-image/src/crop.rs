//! Background-aware autocrop.

use image::Rgba;
use tracing::debug;

use crate::surface::{DrawableSurface, Rect};

/// Find the tightest rectangle enclosing every pixel whose RGB differs from
/// `background` (alpha is ignored).
///
/// Each edge is found by its own early-exit scan. A buffer with no content at
/// all crops to the full buffer rather than to an empty rectangle.
pub fn autocrop<S: DrawableSurface + ?Sized>(buffer: &S, background: Rgba<u8>) -> Rect {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Rect::full(width, height);
    }

    let is_content = |x: u32, y: u32| {
        let p = buffer.pixel(x, y);
        p[0] != background[0] || p[1] != background[1] || p[2] != background[2]
    };
    let row_has_content = |y: u32| (0..width).any(|x| is_content(x, y));
    let column_has_content = |x: u32| (0..height).any(|y| is_content(x, y));

    let top = (0..height).find(|&y| row_has_content(y)).unwrap_or(0);
    let bottom = (0..height)
        .rev()
        .find(|&y| row_has_content(y))
        .unwrap_or(height - 1);
    let left = (0..width).find(|&x| column_has_content(x)).unwrap_or(0);
    let right = (0..width)
        .rev()
        .find(|&x| column_has_content(x))
        .unwrap_or(width - 1);

    let rect = Rect::new(left, top, right - left + 1, bottom - top + 1);
    debug!(
        left = rect.left,
        top = rect.top,
        width = rect.width,
        height = rect.height,
        "Autocrop bounds"
    );
    rect
}
