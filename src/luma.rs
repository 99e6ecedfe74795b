//! Grayscale extraction from interleaved color samples.
//!
//! Both the template and every probed candidate go through the same
//! conversion: ITU-R BT.601 luma weights, truncated toward zero to an
//! integral value. Template and candidates must quantize identically or
//! the correlation picks up a systematic bias.

use crate::image::{PixelSource, Rect};
use crate::util::{AlignError, AlignResult};

/// Owned luminance buffer in row-major order, immutable after creation.
#[derive(Debug, Clone)]
pub struct LumaBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl LumaBuffer {
    /// Extracts the luminance of `rect` from a pixel source.
    ///
    /// Per pixel: `luma = trunc(0.299*R + 0.587*G + 0.114*B)`. Alpha and any
    /// extra channels are ignored.
    pub fn from_source<S: PixelSource>(src: &S, rect: Rect) -> AlignResult<Self> {
        let channels = src.channels();
        if channels != 3 && channels != 4 {
            return Err(AlignError::UnsupportedChannels { channels });
        }

        let samples = src.read_rect(rect)?;
        let needed = rect.area() * channels;
        if samples.len() != needed {
            return Err(AlignError::BufferSizeMismatch {
                needed,
                got: samples.len(),
            });
        }

        let mut data = Vec::with_capacity(rect.area());
        for px in samples.chunks_exact(channels) {
            let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            data.push(luma.trunc());
        }

        Ok(Self {
            data,
            width: rect.width,
            height: rect.height,
        })
    }

    /// Wraps an already-grayscale buffer; length must equal `width * height`.
    pub fn from_vec(data: Vec<f32>, width: u32, height: u32) -> AlignResult<Self> {
        if width == 0 || height == 0 {
            return Err(AlignError::InvalidDimensions { width, height });
        }
        let needed = width as usize * height as usize;
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
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance samples in row-major order.
    pub fn samples(&self) -> &[f32] {
        &self.data
    }
}
