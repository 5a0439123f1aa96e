//! What the pipeline hands to the external render surface each tick.

use image::RgbaImage;

/// Circle drawn at the pointer in paint mode, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushCursor {
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
}

/// One presentable frame.
#[derive(Debug)]
pub struct Frame<'a> {
    /// Display buffer, to be stretched over the whole canvas.
    pub buffer: &'a RgbaImage,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Status lines to overlay, when the UI is visible.
    pub status: Option<Vec<String>>,
    pub brush_cursor: Option<BrushCursor>,
}

/// Presentation capability supplied by the host.
pub trait RenderSurface {
    /// Resize the on-screen canvas.
    fn resize(&mut self, width: u32, height: u32);

    fn present(&mut self, frame: &Frame<'_>);

    fn show_help(&mut self, text: &str);

    fn show_processing(&mut self, text: &str);
}
