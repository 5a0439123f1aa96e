//! Threshold binarization and its single-slot memo.
//!
//! A pixel is "light" when the mean of its RGB channels is strictly above the
//! threshold. Light pixels (and fully transparent ones) become the background
//! color; everything else becomes the foreground, black on a normal render and
//! white on an inverted one.

use image::{Rgba, RgbaImage};
use tracing::{debug, trace};

use crate::{BLACK, WHITE};

/// Convert an RGBA image to an opaque two-tone bitmap of the same size.
pub fn monochrome_convert(
    img: &RgbaImage,
    threshold: u8,
    invert: bool,
    background: Rgba<u8>,
) -> RgbaImage {
    let (width, height) = img.dimensions();
    debug!(width, height, threshold, invert, "Applying threshold conversion");

    let light = if invert { 0 } else { 255 };
    let foreground = if invert { WHITE } else { BLACK };
    let background = Rgba([background[0], background[1], background[2], 255]);
    // avg > threshold  <=>  r + g + b > 3 * threshold, without rounding
    let cutoff = 3 * u32::from(threshold);

    let mut output = RgbaImage::new(width, height);
    for (src, dst) in img.pixels().zip(output.pixels_mut()) {
        let [r, g, b, a] = src.0;
        let sum = u32::from(r) + u32::from(g) + u32::from(b);
        let mut bw: u8 = if sum > cutoff { 255 } else { 0 };
        if invert {
            bw = 255 - bw;
        }
        *dst = if a == 0 || bw == light {
            background
        } else {
            foreground
        };
    }

    output
}

struct CacheEntry {
    threshold: u8,
    invert: bool,
    bitmap: RgbaImage,
}

/// Memo holding the most recent threshold conversion.
///
/// Keyed on `(threshold, invert)` only. The background color is expected to
/// follow the invert flag, and a new source image must be announced with
/// [`ThresholdCache::invalidate`].
#[derive(Default)]
pub struct ThresholdCache {
    entry: Option<CacheEntry>,
    recomputations: u64,
}

impl ThresholdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the bitmap for `(threshold, invert)`, converting only on a key change.
    pub fn get(
        &mut self,
        image: &RgbaImage,
        threshold: u8,
        invert: bool,
        background: Rgba<u8>,
    ) -> &RgbaImage {
        if self.is_valid_for(threshold, invert) {
            trace!(threshold, invert, "Threshold cache hit");
        } else {
            self.entry = None;
        }

        let recomputations = &mut self.recomputations;
        let entry = self.entry.get_or_insert_with(|| {
            *recomputations += 1;
            CacheEntry {
                threshold,
                invert,
                bitmap: monochrome_convert(image, threshold, invert, background),
            }
        });
        &entry.bitmap
    }

    pub fn is_valid_for(&self, threshold: u8, invert: bool) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|e| e.threshold == threshold && e.invert == invert)
    }

    /// Drop the cached bitmap. Called whenever the source image changes.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("Threshold cache invalidated");
        }
    }

    /// Number of conversions performed since construction.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
