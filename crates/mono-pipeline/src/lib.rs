//! Interactive monochrome compositing pipeline.
//!
//! Owns the view state, buffer slots and interaction modes, and drives the
//! raster primitives in `mono-image` to produce the display buffer that an
//! external render surface presents once per tick.

pub mod buffers;
pub mod compositor;
pub mod controller;
pub mod export;
pub mod input;
pub mod mode;
pub mod options;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod text;
pub mod view;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use image;
pub use controller::{InteractionController, KeyOutcome, LoadOutcome, LoadTicket, StatusSnapshot};
pub use export::Export;
pub use input::{Command, Key, Modifiers, PointerEvent};
pub use mode::Mode;
pub use options::PipelineOptions;
pub use render::{BrushCursor, Frame, RenderSurface};
pub use view::ViewState;

/// Errors that can occur while loading or exporting images.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Decode raw file bytes into an RGBA image.
pub fn decode_image(bytes: &[u8]) -> Result<image::RgbaImage> {
    let decoded = image::load_from_memory(bytes).map_err(PipelineError::Decode)?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(PipelineError::EmptyImage {
            width: rgba.width(),
            height: rgba.height(),
        });
    }
    Ok(rgba)
}

/// Read and decode an image file.
pub fn read_image(path: impl AsRef<std::path::Path>) -> Result<image::RgbaImage> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}
