//! Layer composition for paint mode and view mode.
//!
//! Paint mode shows the threshold bitmap and paint layer 1:1 so strokes land
//! on image pixels. View mode scales both layers to the output, crops away the
//! background, refits the crop and applies the user zoom.

use mono_image::{Blend, DrawableSurface, Placement, Rect, autocrop};
use tracing::debug;

use crate::buffers::Slot;
use crate::options::{DEFAULT_MAX_COMPOSITE_PIXELS, PipelineOptions};
use crate::state::PipelineState;
use crate::view::ViewTransform;

/// Geometry of the last view-mode composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewComposite {
    /// Scale from image pixels to composite pixels.
    pub scale: f64,
    /// Content bounds inside the composite buffer.
    pub crop: Rect,
    pub final_width: u32,
    pub final_height: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct LayerCompositor {
    output_size: u32,
    max_composite_pixels: u64,
}

impl LayerCompositor {
    pub fn new(output_size: u32) -> Self {
        Self {
            output_size,
            max_composite_pixels: DEFAULT_MAX_COMPOSITE_PIXELS,
        }
    }

    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(options.output_size).with_max_composite_pixels(options.max_composite_pixels)
    }

    /// Cap the composite buffer area; see [`ViewTransform::composite_scale`].
    pub fn with_max_composite_pixels(mut self, val: u64) -> Self {
        self.max_composite_pixels = val;
        self
    }

    /// Unscaled composite into an image-sized display buffer.
    pub fn compose_paint(&self, state: &mut PipelineState) {
        let view = state.view;
        let background = view.background();
        let (width, height) = state.image.dimensions();

        let bitmap = state
            .cache
            .get(&state.image, view.threshold, view.invert, background);
        let layer = state.paint.layer();
        let display = state.buffers.resize(Slot::Display, width, height, background);

        display.clear(background);
        let (bw, bh) = bitmap.dimensions();
        display.blit(
            bitmap,
            Placement::centered(Rect::full(bw, bh), bw, bh, width, height),
            Blend::Replace,
        );
        let (pw, ph) = layer.dimensions();
        display.blit(
            layer,
            Placement::centered(Rect::full(pw, ph), pw, ph, width, height),
            Blend::Over,
        );

        state.dirty = true;
        debug!(width, height, threshold = view.threshold, "Paint composite built");
    }

    /// Scaled, cropped and zoomed composite into the square output buffer.
    pub fn compose_view(&self, state: &mut PipelineState) -> ViewComposite {
        let view = state.view;
        let background = view.background();
        let transform = ViewTransform::new(self.output_size, view.fit_to_width);
        let (width, height) = state.image.dimensions();
        let scale = transform.composite_scale(width, height, self.max_composite_pixels);
        let (scaled_width, scaled_height) =
            transform.composite_dimensions(width, height, self.max_composite_pixels);
        // Pan is in full-scale output pixels
        let pan = (f64::from(view.pan_offset) * scale / transform.fit_scale(width, height))
            .round() as i64;

        let bitmap = state
            .cache
            .get(&state.image, view.threshold, view.invert, background);
        let layer = state.paint.layer();
        let (composite, display) = state.buffers.resize_pair(
            (Slot::Composite, scaled_width, scaled_height),
            (Slot::Display, self.output_size, self.output_size),
            background,
        );

        // Base layer follows the pan; the paint layer stays put
        composite.clear(background);
        composite.blit(
            bitmap,
            Placement::scaled(
                Rect::full(width, height),
                0,
                pan,
                scaled_width,
                scaled_height,
            ),
            Blend::Replace,
        );
        let (pw, ph) = layer.dimensions();
        composite.blit(
            layer,
            Placement::scaled(Rect::full(pw, ph), 0, 0, scaled_width, scaled_height),
            Blend::Over,
        );

        let crop = autocrop(&*composite, background);
        let (final_width, final_height) = transform.final_dimensions(crop, view.size_ratio());

        display.clear(background);
        display.blit(
            composite,
            Placement::centered(
                crop,
                final_width,
                final_height,
                self.output_size,
                self.output_size,
            ),
            Blend::Replace,
        );

        state.dirty = true;
        debug!(
            scale,
            scaled_width,
            scaled_height,
            final_width,
            final_height,
            zoom = view.zoom_percent,
            pan = view.pan_offset,
            "View composite built"
        );

        ViewComposite {
            scale,
            crop,
            final_width,
            final_height,
        }
    }
}
