//! Raster primitives for the monochrome compositing pipeline.
//!
//! Provides threshold binarization with a single-slot cache, background-aware
//! autocrop, the image-space paint layer, and the drawing surface they share.

pub mod crop;
pub mod paint;
pub mod surface;
pub mod threshold;

use image::Rgba;

// Re-exports for convenience
pub use crop::autocrop;
pub use paint::PaintSurface;
pub use surface::{Blend, DrawableSurface, Placement, Rect};
pub use threshold::{ThresholdCache, monochrome_convert};

/// Opaque white: the default background and ink color.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Opaque black: the background when the output is inverted.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fully transparent pixel, written by the eraser.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
