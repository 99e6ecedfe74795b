//! Patchalign locates a fixed reference patch in target images by
//! normalized cross-correlation over a bounded translation search.
//!
//! The search is two-pass coarse-to-fine: a strided scan over the full
//! radius followed by a unit-stride refinement around the coarse winner.
//! Hosts plug in through the [`PixelSource`] and [`SelectionProvider`]
//! traits; optional parallelism is available via the `rayon` feature and
//! structured logging via the `tracing` feature.

pub mod batch;
pub mod image;
pub mod luma;
pub mod score;
pub mod search;
pub(crate) mod trace;
pub mod util;

pub use batch::{align_batch, align_batch_with, BatchReport, Decision};
pub use image::{PixelSource, RasterImage, Rect, SelectionProvider};
pub use luma::LumaBuffer;
pub use score::ncc;
pub use search::{AlignConfig, Aligner, Alignment};
pub use util::{AlignError, AlignResult};
