//! Drawing capability shared by every raster in the pipeline.
//!
//! The compositor, cropper and paint layer only talk to [`DrawableSurface`],
//! so nothing above this module depends on how pixels are stored.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width` x `height` raster.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// How source pixels combine with the destination during a blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Overwrite destination pixels, alpha included.
    Replace,
    /// Source-over alpha compositing.
    Over,
}

/// Where a source rectangle lands on a surface.
///
/// The destination box may be larger or smaller than `src` (nearest-neighbour
/// scaling) and may hang off any edge of the surface (clipped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub src: Rect,
    pub dst_x: i64,
    pub dst_y: i64,
    pub dst_width: u32,
    pub dst_height: u32,
}

impl Placement {
    /// Place the whole of a `width` x `height` source unscaled at `(x, y)`.
    pub fn at(width: u32, height: u32, x: i64, y: i64) -> Self {
        Self {
            src: Rect::full(width, height),
            dst_x: x,
            dst_y: y,
            dst_width: width,
            dst_height: height,
        }
    }

    /// Place `src` scaled to `dst_width` x `dst_height` with its top-left at `(x, y)`.
    pub fn scaled(src: Rect, x: i64, y: i64, dst_width: u32, dst_height: u32) -> Self {
        Self {
            src,
            dst_x: x,
            dst_y: y,
            dst_width,
            dst_height,
        }
    }

    /// Place `src` scaled to `dst_width` x `dst_height`, centered on a
    /// `canvas_width` x `canvas_height` surface.
    pub fn centered(
        src: Rect,
        dst_width: u32,
        dst_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        let x = (i64::from(canvas_width) - i64::from(dst_width)).div_euclid(2);
        let y = (i64::from(canvas_height) - i64::from(dst_height)).div_euclid(2);
        Self::scaled(src, x, y, dst_width, dst_height)
    }
}

/// Narrow drawing interface: pixel access, clear, blit and line strokes.
pub trait DrawableSurface {
    fn dimensions(&self) -> (u32, u32);

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8>;

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>);

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Rgba<u8>) {
        let (width, height) = self.dimensions();
        for y in 0..height {
            for x in 0..width {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Copy (or composite) a region of `src` onto this surface.
    ///
    /// Sampling is nearest-neighbour. Only destination pixels inside the
    /// surface are visited, so the cost is bounded by the surface size no
    /// matter how far the placement is scaled up.
    fn blit(&mut self, src: &RgbaImage, placement: Placement, blend: Blend) {
        let Placement {
            src: rect,
            dst_x,
            dst_y,
            dst_width,
            dst_height,
        } = placement;
        if rect.is_empty() || dst_width == 0 || dst_height == 0 {
            return;
        }
        debug_assert!(rect.left + rect.width <= src.width());
        debug_assert!(rect.top + rect.height <= src.height());

        let (width, height) = self.dimensions();
        let x0 = dst_x.max(0);
        let x1 = (dst_x + i64::from(dst_width)).min(i64::from(width));
        let y0 = dst_y.max(0);
        let y1 = (dst_y + i64::from(dst_height)).min(i64::from(height));

        for y in y0..y1 {
            let sy = rect.top + ((y - dst_y) * i64::from(rect.height) / i64::from(dst_height)) as u32;
            for x in x0..x1 {
                let sx =
                    rect.left + ((x - dst_x) * i64::from(rect.width) / i64::from(dst_width)) as u32;
                let source = *src.get_pixel(sx, sy);
                let (tx, ty) = (x as u32, y as u32);
                match blend {
                    Blend::Replace => self.set_pixel(tx, ty, source),
                    Blend::Over => match source[3] {
                        0 => {}
                        255 => self.set_pixel(tx, ty, source),
                        _ => {
                            let base = self.pixel(tx, ty);
                            self.set_pixel(tx, ty, blend_over(base, source));
                        }
                    },
                }
            }
        }
    }

    /// Draw a segment `width` pixels wide with round caps, overwriting the
    /// covered pixels with `color`.
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: u32, color: Rgba<u8>);
}

impl DrawableSurface for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.get_pixel(x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        self.put_pixel(x, y, color);
    }

    fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels_mut() {
            *pixel = color;
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), width: u32, color: Rgba<u8>) {
        let stamp = BrushStamp::new(width);
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        // One stamp per pixel of length keeps the body gap-free for any radius.
        let steps = dx.hypot(dy).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            stamp.draw(self, (from.0 + dx * t, from.1 + dy * t), color);
        }
    }
}

/// Round brush tip exactly `width` pixels across.
///
/// An integer disc of radius `r` spans `2r + 1` pixels, so odd widths use one
/// disc and even widths use the union of four discs one pixel apart.
struct BrushStamp {
    radius: i32,
    even: bool,
}

impl BrushStamp {
    fn new(width: u32) -> Self {
        let width = width.max(1);
        let even = width % 2 == 0;
        let radius = (if even { width / 2 - 1 } else { width / 2 }) as i32;
        Self { radius, even }
    }

    fn draw(&self, canvas: &mut RgbaImage, (x, y): (f32, f32), color: Rgba<u8>) {
        if self.even {
            // Centered on the pixel corner nearest to the point
            let (cx, cy) = ((x - 0.5).floor() as i32, (y - 0.5).floor() as i32);
            for (ox, oy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                draw_filled_circle_mut(canvas, (cx + ox, cy + oy), self.radius, color);
            }
        } else {
            let center = (x.floor() as i32, y.floor() as i32);
            draw_filled_circle_mut(canvas, center, self.radius, color);
        }
    }
}

/// Source-over compositing of `top` onto `base`.
fn blend_over(base: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let alpha = f32::from(top[3]) / 255.0;
    let base_alpha = f32::from(base[3]) / 255.0;
    let out_alpha = alpha + base_alpha * (1.0 - alpha);
    if out_alpha <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let value = (f32::from(top[i]) * alpha + f32::from(base[i]) * base_alpha * (1.0 - alpha))
            / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_alpha * 255.0).round() as u8,
    ])
}
