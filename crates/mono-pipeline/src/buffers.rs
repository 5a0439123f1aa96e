//! Named buffer slots with explicit reallocation.
//!
//! A slot owns its raster outright: resizing to new dimensions replaces the
//! backing storage, and releasing drops it. Callers only ever borrow.

use image::{Rgba, RgbaImage};
use tracing::debug;

/// The scratch and output rasters the compositor draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Fit-scaled merge of base and paint layers, before cropping.
    Composite,
    /// The raster presented on screen and exported.
    Display,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::Composite => 0,
            Slot::Display => 1,
        }
    }
}

#[derive(Default)]
pub struct BufferArena {
    slots: [Option<RgbaImage>; 2],
    allocations: u64,
}

impl BufferArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure `slot` holds a `width` x `height` raster and return it.
    ///
    /// A raster of the right size is reused as-is; otherwise a new one filled
    /// with `fill` replaces it.
    pub fn resize(&mut self, slot: Slot, width: u32, height: u32, fill: Rgba<u8>) -> &mut RgbaImage {
        ensure(
            &mut self.slots[slot.index()],
            slot,
            (width, height),
            fill,
            &mut self.allocations,
        )
    }

    /// Resize two distinct slots at once and borrow both.
    ///
    /// # Panics
    /// Panics if both requests name the same slot.
    pub fn resize_pair(
        &mut self,
        first: (Slot, u32, u32),
        second: (Slot, u32, u32),
        fill: Rgba<u8>,
    ) -> (&mut RgbaImage, &mut RgbaImage) {
        assert_ne!(first.0, second.0, "Slot pair must name two different slots");
        let [composite, display] = &mut self.slots;
        let (a, b) = match first.0 {
            Slot::Composite => (composite, display),
            Slot::Display => (display, composite),
        };
        let a = ensure(a, first.0, (first.1, first.2), fill, &mut self.allocations);
        let b = ensure(b, second.0, (second.1, second.2), fill, &mut self.allocations);
        (a, b)
    }

    /// Drop the raster held in `slot`. Returns whether one was held.
    pub fn release(&mut self, slot: Slot) -> bool {
        let released = self.slots[slot.index()].take().is_some();
        if released {
            debug!(?slot, "Buffer released");
        }
        released
    }

    pub fn get(&self, slot: Slot) -> Option<&RgbaImage> {
        self.slots[slot.index()].as_ref()
    }

    pub fn dimensions(&self, slot: Slot) -> Option<(u32, u32)> {
        self.get(slot).map(|img| img.dimensions())
    }

    /// Number of rasters allocated by `resize` since construction.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }
}

fn ensure<'a>(
    entry: &'a mut Option<RgbaImage>,
    slot: Slot,
    (width, height): (u32, u32),
    fill: Rgba<u8>,
    allocations: &mut u64,
) -> &'a mut RgbaImage {
    if entry
        .as_ref()
        .is_some_and(|img| img.dimensions() != (width, height))
    {
        *entry = None;
    }
    entry.get_or_insert_with(|| {
        *allocations += 1;
        debug!(?slot, width, height, "Buffer allocated");
        RgbaImage::from_pixel(width, height, fill)
    })
}
