//! PNG export of the display buffer.

use std::io::Cursor;

use chrono::{Datelike, NaiveDateTime, Timelike};
use image::{ImageFormat, RgbaImage};
use tracing::info;

use crate::{PipelineError, Result};

/// An encoded export ready to be written by the host.
#[derive(Debug, Clone)]
pub struct Export {
    pub filename: String,
    pub png: Vec<u8>,
}

/// `monochrome_image.<Y>.<M>.<D><h><m><s>.png`, fields unpadded.
pub fn export_filename(at: NaiveDateTime) -> String {
    format!(
        "monochrome_image.{}.{}.{}{}{}{}.png",
        at.year(),
        at.month(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

pub fn encode_png(buffer: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(PipelineError::Encode)?;
    Ok(bytes)
}

/// Encode `buffer` and name it after `at`.
pub fn export(buffer: &RgbaImage, at: NaiveDateTime) -> Result<Export> {
    let png = encode_png(buffer)?;
    let filename = export_filename(at);
    info!(%filename, bytes = png.len(), "Display buffer exported");
    Ok(Export { filename, png })
}
