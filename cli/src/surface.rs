//! Render surface that logs frames instead of drawing them.

use mono_pipeline::{Frame, RenderSurface};

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    frames: u64,
    /// Overlay text currently on screen, so repeated ticks log it once.
    overlay: Option<String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn show_overlay(&mut self, text: &str) -> bool {
        if self.overlay.as_deref() == Some(text) {
            return false;
        }
        self.overlay = Some(text.to_string());
        true
    }
}

impl RenderSurface for HeadlessSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        tracing::info!(width, height, "Canvas resized");
    }

    fn present(&mut self, frame: &Frame<'_>) {
        self.overlay = None;
        self.frames += 1;
        let (buffer_width, buffer_height) = frame.buffer.dimensions();
        tracing::debug!(
            frame = self.frames,
            buffer_width,
            buffer_height,
            canvas_width = self.width,
            canvas_height = self.height,
            cursor = ?frame.brush_cursor,
            "Frame presented"
        );
        if let Some(lines) = &frame.status {
            tracing::debug!("Status: {}", lines.join(" | "));
        }
    }

    fn show_help(&mut self, text: &str) {
        if self.show_overlay(text) {
            tracing::info!("Help:\n{text}");
        }
    }

    fn show_processing(&mut self, text: &str) {
        if self.show_overlay(text) {
            tracing::info!("{text}");
        }
    }
}
