//! Everything the pipeline mutates, gathered in one owned value.

use image::RgbaImage;
use mono_image::{PaintSurface, ThresholdCache};
use tracing::info;

use crate::buffers::{BufferArena, Slot};
use crate::options::PipelineOptions;
use crate::view::{ViewState, ViewTransform};

/// Source image, caches, layers and buffers for one interactive session.
///
/// Owned by the [`InteractionController`](crate::InteractionController) and
/// lent to the compositor for each call.
pub struct PipelineState {
    pub(crate) image: RgbaImage,
    pub(crate) view: ViewState,
    pub(crate) cache: ThresholdCache,
    pub(crate) paint: PaintSurface,
    pub(crate) buffers: BufferArena,
    pub(crate) offset_max: i32,
    pub(crate) dirty: bool,
}

impl PipelineState {
    pub fn new(image: RgbaImage, options: &PipelineOptions) -> Self {
        let (width, height) = image.dimensions();
        let view = ViewState::from_options(options);
        let offset_max =
            ViewTransform::new(options.output_size, view.fit_to_width).offset_max(width, height);
        Self {
            image,
            view,
            cache: ThresholdCache::new(),
            paint: PaintSurface::new(width, height, options.ink),
            buffers: BufferArena::new(),
            offset_max,
            dirty: false,
        }
    }

    /// Swap in a freshly decoded image and reset everything derived from the old one.
    pub fn replace_image(&mut self, image: RgbaImage, output_size: u32) {
        let (width, height) = image.dimensions();
        self.image = image;
        self.cache.invalidate();
        self.paint.reset(width, height);
        self.buffers.release(Slot::Composite);
        self.view.pan_offset = 0;
        self.refresh_offset_max(output_size);
        info!(width, height, offset_max = self.offset_max, "Source image replaced");
    }

    /// Recompute the pan bound for the current image and fit mode, re-clamping the pan.
    pub fn refresh_offset_max(&mut self, output_size: u32) {
        let (width, height) = self.image.dimensions();
        self.offset_max =
            ViewTransform::new(output_size, self.view.fit_to_width).offset_max(width, height);
        self.view.clamp_pan(self.offset_max);
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn paint(&self) -> &PaintSurface {
        &self.paint
    }

    pub fn cache(&self) -> &ThresholdCache {
        &self.cache
    }

    pub fn buffers(&self) -> &BufferArena {
        &self.buffers
    }

    pub fn display(&self) -> Option<&RgbaImage> {
        self.buffers.get(Slot::Display)
    }

    pub fn offset_max(&self) -> i32 {
        self.offset_max
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
