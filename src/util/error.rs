//! Error types for patchalign.

use thiserror::Error;

/// Result alias for patchalign operations.
pub type AlignResult<T> = std::result::Result<T, AlignError>;

/// Errors that can occur while preparing or running an alignment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    /// A region or buffer has a zero-sized dimension.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// A requested region does not lie within the source image.
    #[error(
        "region {width}x{height} at ({x}, {y}) out of bounds for {img_width}x{img_height} image"
    )]
    RegionOutOfBounds {
        /// Region x position in source-local coordinates.
        x: i32,
        /// Region y position in source-local coordinates.
        y: i32,
        /// Region width in pixels.
        width: u32,
        /// Region height in pixels.
        height: u32,
        /// Source image width.
        img_width: u32,
        /// Source image height.
        img_height: u32,
    },
    /// A sample buffer's length disagrees with its stated dimensions.
    #[error("buffer length mismatch: needed {needed} samples, got {got}")]
    BufferSizeMismatch {
        /// Required number of samples.
        needed: usize,
        /// Provided number of samples.
        got: usize,
    },
    /// The pixel source reports a channel count the extractor cannot read.
    #[error("unsupported channel count: {channels} (expected 3 or 4)")]
    UnsupportedChannels {
        /// Reported channels per pixel.
        channels: usize,
    },
    /// A configuration value is outside its valid range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// The selection provider yielded no usable template region.
    #[error("no selection: a non-empty template region is required")]
    NoSelection,
    /// The batch driver was invoked without any target to align.
    #[error("insufficient targets: need at least 1, got {got}")]
    InsufficientTargets {
        /// Number of targets supplied.
        got: usize,
    },
}
