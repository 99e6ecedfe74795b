//! Host collaborator traits.
//!
//! A host satisfies two contracts: a [`PixelSource`] per image that hands
//! out raw interleaved samples for a rectangle, and a [`SelectionProvider`]
//! that designates the template region. Everything else the aligner needs
//! is derived from these.

use crate::image::Rect;
use crate::util::AlignResult;

/// Read-only access to one image's pixel data and placement.
pub trait PixelSource {
    /// Image width in pixels.
    fn width(&self) -> u32;

    /// Image height in pixels.
    fn height(&self) -> u32;

    /// Channels per pixel; 3 (RGB) and 4 (RGBA) are supported.
    fn channels(&self) -> usize;

    /// The image's offset in the shared coordinate space.
    ///
    /// For layered hosts this is the layer offset within the canvas; a
    /// standalone image sits at `(0, 0)`.
    fn origin(&self) -> (i32, i32);

    /// Reads interleaved row-major 8-bit samples for `rect`, given in this
    /// image's local coordinates.
    ///
    /// A failed read (out-of-bounds rectangle, unreadable backing store) is
    /// an error the caller recovers from, not a panic.
    fn read_rect(&self, rect: Rect) -> AlignResult<Vec<u8>>;
}

/// Supplies the single rectangle designated as the template area.
pub trait SelectionProvider {
    /// Returns the template region, or `None` when nothing is selected.
    ///
    /// The rectangle is expressed in the reference image's local
    /// coordinates. A zero-area rectangle counts as no selection.
    fn selection(&self) -> Option<Rect>;
}

impl SelectionProvider for Rect {
    fn selection(&self) -> Option<Rect> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(*self)
    }
}

impl SelectionProvider for Option<Rect> {
    fn selection(&self) -> Option<Rect> {
        self.and_then(|rect| rect.selection())
    }
}
