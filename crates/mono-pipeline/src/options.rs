//! Pipeline configuration options.
//!
//! These control buffer resolutions, the starting view and the paint ink.
//! The binary fills them from validated settings; tests use the defaults.

use image::Rgba;
use mono_image::WHITE;

use crate::view::{BRUSH_MAX, BRUSH_MIN, DEFAULT_THRESHOLD};

/// Four 1000x1000 outputs' worth of pixels (16 MB of RGBA).
pub const DEFAULT_MAX_COMPOSITE_PIXELS: u64 = 4_000_000;

/// Configuration for an [`InteractionController`](crate::InteractionController).
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Side of the square view-mode display buffer, in pixels.
    pub output_size: u32,

    /// Side of the on-screen canvas in view mode. Also sets the paint-mode
    /// canvas scale (`display_size / max(width, height)`).
    pub display_size: u32,

    /// Threshold used at startup and restored by reset.
    pub threshold: u8,

    /// Brush diameter at startup, in image pixels.
    pub brush_size: u32,

    /// Vertical pan per key press, in output pixels.
    pub pan_step: i32,

    /// Scale the image width (instead of the larger side) to the output size.
    pub fit_to_width: bool,

    /// Color laid down by the brush.
    pub ink: Rgba<u8>,

    /// Pixel budget for the view-mode composite buffer. Tall, thin images are
    /// composited at a reduced scale to stay within it.
    pub max_composite_pixels: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_size: 1000,
            display_size: 600,
            threshold: DEFAULT_THRESHOLD,
            brush_size: 10,
            pan_step: 100,
            fit_to_width: true,
            ink: WHITE,
            max_composite_pixels: DEFAULT_MAX_COMPOSITE_PIXELS,
        }
    }
}

impl PipelineOptions {
    /// Create options with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the output buffer size.
    ///
    /// # Panics
    /// Panics if `val` is zero.
    pub fn with_output_size(mut self, val: u32) -> Self {
        assert!(val > 0, "Output size must be positive");
        self.output_size = val;
        self
    }

    /// Builder: set the view-mode canvas size.
    ///
    /// # Panics
    /// Panics if `val` is zero.
    pub fn with_display_size(mut self, val: u32) -> Self {
        assert!(val > 0, "Display size must be positive");
        self.display_size = val;
        self
    }

    /// Builder: set the startup threshold.
    pub fn with_threshold(mut self, val: u8) -> Self {
        self.threshold = val;
        self
    }

    /// Builder: set the startup brush size, clamped to the brush range.
    pub fn with_brush_size(mut self, val: u32) -> Self {
        self.brush_size = val.clamp(BRUSH_MIN, BRUSH_MAX);
        self
    }

    /// Builder: set the pan step.
    pub fn with_pan_step(mut self, val: i32) -> Self {
        self.pan_step = val.max(1);
        self
    }

    /// Builder: set the fit-to-width flag.
    pub fn with_fit_to_width(mut self, val: bool) -> Self {
        self.fit_to_width = val;
        self
    }

    /// Builder: set the brush ink color.
    pub fn with_ink(mut self, val: Rgba<u8>) -> Self {
        self.ink = val;
        self
    }

    /// Builder: set the composite buffer pixel budget.
    pub fn with_max_composite_pixels(mut self, val: u64) -> Self {
        self.max_composite_pixels = val;
        self
    }
}
