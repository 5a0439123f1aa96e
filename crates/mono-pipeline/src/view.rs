//! View state and the scale / zoom / pan math.
//!
//! Every adjustment saturates at its range instead of failing.

use image::Rgba;
use mono_image::{BLACK, Rect, WHITE};
use serde::Serialize;

use crate::options::PipelineOptions;

pub const DEFAULT_THRESHOLD: u8 = 128;
pub const ZOOM_MIN_PERCENT: u32 = 1;
pub const ZOOM_MAX_PERCENT: u32 = 1000;
pub const DEFAULT_ZOOM_PERCENT: u32 = 100;
pub const BRUSH_MIN: u32 = 1;
pub const BRUSH_MAX: u32 = 100;

/// Adjustment granularity chosen by the modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Fine,
    Coarse,
}

impl Step {
    /// Shift selects fine steps.
    pub fn from_shift(shift: bool) -> Self {
        if shift { Step::Fine } else { Step::Coarse }
    }

    pub fn amount(self) -> i32 {
        match self {
            Step::Fine => 1,
            Step::Coarse => 10,
        }
    }
}

/// User-adjustable view parameters.
///
/// Zoom is held as an integer percentage so repeated steps never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub threshold: u8,
    pub invert: bool,
    pub zoom_percent: u32,
    pub pan_offset: i32,
    pub brush_size: u32,
    pub fit_to_width: bool,
}

impl ViewState {
    pub fn from_options(options: &PipelineOptions) -> Self {
        Self {
            threshold: options.threshold,
            invert: false,
            zoom_percent: DEFAULT_ZOOM_PERCENT,
            pan_offset: 0,
            brush_size: options.brush_size.clamp(BRUSH_MIN, BRUSH_MAX),
            fit_to_width: options.fit_to_width,
        }
    }

    /// Zoom as a multiplier in `[0.01, 10]`.
    pub fn size_ratio(&self) -> f64 {
        f64::from(self.zoom_percent) / 100.0
    }

    /// Background follows the invert flag: white normally, black inverted.
    pub fn background(&self) -> Rgba<u8> {
        if self.invert { BLACK } else { WHITE }
    }

    pub fn adjust_threshold(&mut self, delta: i32) {
        self.threshold = (i32::from(self.threshold) + delta).clamp(0, 255) as u8;
    }

    pub fn adjust_zoom(&mut self, delta: i32) {
        self.zoom_percent = (i64::from(self.zoom_percent) + i64::from(delta))
            .clamp(i64::from(ZOOM_MIN_PERCENT), i64::from(ZOOM_MAX_PERCENT))
            as u32;
    }

    pub fn adjust_brush(&mut self, delta: i32) {
        self.brush_size = (i64::from(self.brush_size) + i64::from(delta))
            .clamp(i64::from(BRUSH_MIN), i64::from(BRUSH_MAX)) as u32;
    }

    pub fn adjust_pan(&mut self, delta: i32, offset_max: i32) {
        self.pan_offset = self.pan_offset.saturating_add(delta);
        self.clamp_pan(offset_max);
    }

    pub fn clamp_pan(&mut self, offset_max: i32) {
        let bound = offset_max.max(0);
        self.pan_offset = self.pan_offset.clamp(-bound, bound);
    }

    /// Flip invert; the background flips with it.
    pub fn toggle_invert(&mut self) {
        self.invert = !self.invert;
    }

    /// Restore the startup threshold and 100% zoom.
    pub fn reset(&mut self, threshold: u8) {
        self.threshold = threshold;
        self.zoom_percent = DEFAULT_ZOOM_PERCENT;
    }
}

/// Fit rule for a square output of `output_size` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTransform {
    pub output_size: u32,
    pub fit_to_width: bool,
}

impl ViewTransform {
    pub fn new(output_size: u32, fit_to_width: bool) -> Self {
        Self {
            output_size,
            fit_to_width,
        }
    }

    /// Scale that makes the width (or the larger side) match the output size.
    pub fn fit_scale(&self, width: u32, height: u32) -> f64 {
        let basis = if self.fit_to_width {
            width
        } else {
            width.max(height)
        };
        f64::from(self.output_size) / f64::from(basis.max(1))
    }

    /// Scale for the composite buffer: the fit scale, shrunk uniformly when
    /// the scaled raster would exceed `max_pixels` (never below `output_size²`).
    pub fn composite_scale(&self, width: u32, height: u32, max_pixels: u64) -> f64 {
        let fit = self.fit_scale(width, height);
        let budget = max_pixels.max(u64::from(self.output_size).pow(2)) as f64;
        let area = f64::from(width) * fit * f64::from(height) * fit;
        if area <= budget {
            fit
        } else {
            fit * (budget / area).sqrt()
        }
    }

    /// Composite buffer dimensions for a `width` x `height` source.
    pub fn composite_dimensions(&self, width: u32, height: u32, max_pixels: u64) -> (u32, u32) {
        let fit = self.fit_scale(width, height);
        let scale = self.composite_scale(width, height, max_pixels);
        if scale < fit {
            // Floor so rounding cannot push the area past the budget
            let len = |l: u32| (f64::from(l) * scale).floor().max(1.0) as u32;
            (len(width), len(height))
        } else {
            (scale_len(width, scale), scale_len(height, scale))
        }
    }

    /// Largest pan offset that still keeps the output inside the scaled image.
    ///
    /// Zero unless fitting to width; never negative, so images wider than
    /// they are tall cannot pan.
    pub fn offset_max(&self, width: u32, height: u32) -> i32 {
        if !self.fit_to_width {
            return 0;
        }
        let scale = self.fit_scale(width, height);
        let overflow = (f64::from(height) * scale - f64::from(self.output_size)) / 2.0;
        overflow.floor().max(0.0) as i32
    }

    /// Final size of a crop box refit to the output and multiplied by the zoom.
    pub fn final_dimensions(&self, crop: Rect, size_ratio: f64) -> (u32, u32) {
        let scale = self.fit_scale(crop.width, crop.height) * size_ratio;
        (scale_len(crop.width, scale), scale_len(crop.height, scale))
    }
}

/// Scale from image pixels to paint-mode canvas pixels.
pub fn paint_scale(display_size: u32, width: u32, height: u32) -> f64 {
    f64::from(display_size) / f64::from(width.max(height).max(1))
}

fn scale_len(len: u32, scale: f64) -> u32 {
    (f64::from(len) * scale).round().max(1.0) as u32
}
