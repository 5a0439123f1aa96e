//! Freehand paint layer kept in source-image coordinates.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::TRANSPARENT;
use crate::surface::DrawableSurface;

/// Transparent RGBA layer the size of the source image.
///
/// Strokes are recorded in image pixels, so the layer looks the same at any
/// zoom. Painting writes `ink`; erasing writes transparent pixels.
pub struct PaintSurface {
    layer: RgbaImage,
    ink: Rgba<u8>,
}

impl PaintSurface {
    pub fn new(width: u32, height: u32, ink: Rgba<u8>) -> Self {
        Self {
            layer: RgbaImage::from_pixel(width, height, TRANSPARENT),
            ink,
        }
    }

    /// Draw (or erase) a `brush_size`-wide segment between two image-space points.
    pub fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), brush_size: u32, erase: bool) {
        let color = if erase { TRANSPARENT } else { self.ink };
        self.layer.stroke_line(from, to, brush_size, color);
    }

    /// Make the whole layer transparent again.
    pub fn clear(&mut self) {
        DrawableSurface::clear(&mut self.layer, TRANSPARENT);
        debug!("Paint layer cleared");
    }

    /// Replace the layer with a blank one of new dimensions.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.layer = RgbaImage::from_pixel(width, height, TRANSPARENT);
        debug!(width, height, "Paint layer reset");
    }

    pub fn layer(&self) -> &RgbaImage {
        &self.layer
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.layer.dimensions()
    }

    /// True when nothing has been painted (every pixel transparent).
    pub fn is_blank(&self) -> bool {
        self.layer.pixels().all(|p| p[3] == 0)
    }
}
