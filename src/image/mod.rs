//! Regions, pixel sources, and an owned in-memory raster.
//!
//! The aligner never touches a host's image storage directly. It reads
//! rectangles of interleaved 8-bit samples through the [`PixelSource`]
//! trait, and learns the template region through a [`SelectionProvider`].
//! [`RasterImage`] is the in-memory implementation used by tests, benches,
//! and hosts that already hold pixel data.

use crate::util::{AlignError, AlignResult};

pub mod source;

pub use source::{PixelSource, SelectionProvider};

/// Immutable rectangle in a source's local pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Left edge, in pixels.
    pub x: i32,
    /// Top edge, in pixels.
    pub y: i32,
    /// Width in pixels, must be positive for a usable region.
    pub width: u32,
    /// Height in pixels, must be positive for a usable region.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle; zero-sized rectangles are rejected.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> AlignResult<Self> {
        if width == 0 || height == 0 {
            return Err(AlignError::InvalidDimensions { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Number of pixels covered by the rectangle.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Owned interleaved 8-bit image with 3 or 4 channels per pixel.
///
/// Samples are row-major with no row padding. The image carries an origin
/// offset placing it in the shared coordinate space the aligner translates
/// between (a host's canvas coordinates, for layered images).
#[derive(Debug, Clone)]
pub struct RasterImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: usize,
    origin: (i32, i32),
}

impl RasterImage {
    /// Creates an image whose origin is `(0, 0)` in the shared space.
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: usize) -> AlignResult<Self> {
        Self::with_origin(data, width, height, channels, (0, 0))
    }

    /// Creates an image at an explicit origin offset.
    ///
    /// The buffer length must be exactly `width * height * channels`; both a
    /// short and an oversized buffer are rejected so a stride mismatch cannot
    /// slip through silently.
    pub fn with_origin(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: usize,
        origin: (i32, i32),
    ) -> AlignResult<Self> {
        if width == 0 || height == 0 {
            return Err(AlignError::InvalidDimensions { width, height });
        }
        if channels != 3 && channels != 4 {
            return Err(AlignError::UnsupportedChannels { channels });
        }
        let needed = width as usize * height as usize * channels;
        if data.len() != needed {
            return Err(AlignError::BufferSizeMismatch {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            origin,
        })
    }

    /// Returns the backing interleaved sample buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl PixelSource for RasterImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn origin(&self) -> (i32, i32) {
        self.origin
    }

    fn read_rect(&self, rect: Rect) -> AlignResult<Vec<u8>> {
        let out_of_bounds = AlignError::RegionOutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            img_width: self.width,
            img_height: self.height,
        };
        if rect.x < 0 || rect.y < 0 {
            return Err(out_of_bounds);
        }
        let x = rect.x as u32;
        let y = rect.y as u32;
        let end_x = x.checked_add(rect.width).ok_or(AlignError::InvalidDimensions {
            width: rect.width,
            height: rect.height,
        })?;
        let end_y = y.checked_add(rect.height).ok_or(AlignError::InvalidDimensions {
            width: rect.width,
            height: rect.height,
        })?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let row_samples = rect.width as usize * self.channels;
        let stride = self.width as usize * self.channels;
        let mut out = Vec::with_capacity(rect.height as usize * row_samples);
        for row in y..end_y {
            let start = row as usize * stride + x as usize * self.channels;
            out.extend_from_slice(&self.data[start..start + row_samples]);
        }
        Ok(out)
    }
}
