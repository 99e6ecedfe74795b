//! Two-pass coarse-to-fine alignment search.
//!
//! The aligner fixes a template region once, then locates it in each target
//! with two sequential passes: a wide, strided coarse scan around the
//! template's nominal position, and a unit-stride fine scan around the
//! coarse winner. The coarse grid assumes the similarity surface is smooth
//! enough that the true optimum lies within one coarse step of the best
//! grid point; that is a documented accuracy/speed tradeoff, not a
//! guarantee. The best score seen across both passes wins, so a coarse
//! candidate survives a degenerate fine window.

use crate::image::{PixelSource, Rect};
use crate::luma::LumaBuffer;
use crate::trace::{trace_event, trace_span};
use crate::util::{AlignError, AlignResult};

pub(crate) mod scan;
pub(crate) mod window;

use scan::Best;
use window::SearchWindow;

/// Tuning parameters for alignment, passed at call time rather than held in
/// process-wide state so differently-tuned runs can coexist.
#[derive(Copy, Clone, Debug)]
pub struct AlignConfig {
    /// Maximum distance in pixels to search from the nominal position.
    pub search_radius: u32,
    /// Grid stride of the coarse pass; the fine pass covers half of it.
    pub coarse_step: u32,
    /// Similarity score a match must exceed to be accepted by the driver.
    pub min_overlap: f32,
    /// Host hint: refit the canvas after a batch that moved layers. Carried
    /// on the config surface for hosts, never read by the core.
    pub auto_fit: bool,
    /// Evaluate candidates in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            search_radius: 50,
            coarse_step: 8,
            min_overlap: 0.5,
            auto_fit: true,
            parallel: false,
        }
    }
}

impl AlignConfig {
    /// Validates parameter ranges.
    pub fn validate(&self) -> AlignResult<()> {
        if self.search_radius == 0 {
            return Err(AlignError::InvalidConfig("search_radius must be positive"));
        }
        if self.coarse_step == 0 {
            return Err(AlignError::InvalidConfig("coarse_step must be positive"));
        }
        if !(0.0..=1.0).contains(&self.min_overlap) {
            return Err(AlignError::InvalidConfig("min_overlap must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Result of aligning one target against the template.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Alignment {
    /// Horizontal shift to apply to the target.
    pub dx: i32,
    /// Vertical shift to apply to the target.
    pub dy: i32,
    /// Best similarity seen across both passes; `0.0` when the template
    /// itself was unreadable, `-1.0` when no candidate could be scored.
    pub score: f32,
}

impl Alignment {
    /// Sentinel for an unreadable template: no shift, zero similarity.
    pub(crate) fn no_template() -> Self {
        Self { dx: 0, dy: 0, score: 0.0 }
    }

    /// Sentinel for a search that never scored a candidate. The score sits
    /// below every valid similarity, so no threshold can accept it.
    pub(crate) fn undeterminable() -> Self {
        Self { dx: 0, dy: 0, score: -1.0 }
    }
}

/// Locates one fixed template region in target images.
///
/// The template luminance is extracted once at construction; an aligner is
/// read-only afterwards and may be shared across threads.
pub struct Aligner {
    template: Option<LumaBuffer>,
    /// Template region's top-left corner in the shared coordinate space.
    template_pos: (i32, i32),
    cfg: AlignConfig,
}

impl Aligner {
    /// Builds an aligner for `region` of the reference image.
    ///
    /// A template that cannot be extracted does not fail construction; every
    /// subsequent [`align`](Self::align) reports the no-template sentinel
    /// instead, leaving the decision to the caller.
    pub fn new<S: PixelSource>(reference: &S, region: Rect) -> Self {
        let template = LumaBuffer::from_source(reference, region).ok();
        let (ox, oy) = reference.origin();
        Self {
            template,
            template_pos: (region.x + ox, region.y + oy),
            cfg: AlignConfig::default(),
        }
    }

    /// Replaces the tuning configuration.
    pub fn with_config(mut self, cfg: AlignConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &AlignConfig {
        &self.cfg
    }

    /// True when the template region was extracted successfully.
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Finds the shift that best aligns `target` content with the template.
    ///
    /// The search covers `search_radius` pixels around the template's
    /// nominal position in the target (template position translated through
    /// both images' origins). Candidates whose extraction fails are skipped;
    /// if nothing could be scored at all the undeterminable sentinel is
    /// returned with the offset pinned to `(0, 0)`.
    pub fn align<T: PixelSource>(&self, target: &T) -> Alignment {
        self.align_scanned(target, scan::scan_window)
    }

    /// [`align`](Self::align) with row-parallel candidate evaluation inside
    /// each pass. The result is identical to the serial search; only the
    /// best-of reduction order differs, and tie-breaking is deterministic.
    #[cfg(feature = "rayon")]
    pub fn align_par<T: PixelSource + Sync>(&self, target: &T) -> Alignment {
        self.align_scanned(target, scan::scan_window_par)
    }

    fn align_scanned<T, F>(&self, target: &T, scan_fn: F) -> Alignment
    where
        T: PixelSource,
        F: Fn(&T, &LumaBuffer, &SearchWindow, i32, &mut Best),
    {
        let Some(template) = &self.template else {
            return Alignment::no_template();
        };

        let (tox, toy) = target.origin();
        let nominal = (self.template_pos.0 - tox, self.template_pos.1 - toy);

        let max_x = target.width() as i64 - template.width() as i64;
        let max_y = target.height() as i64 - template.height() as i64;
        if max_x < 0 || max_y < 0 || max_x > i32::MAX as i64 || max_y > i32::MAX as i64 {
            return Alignment::undeterminable();
        }

        let mut best = Best::new();
        let radius = self.cfg.search_radius as i32;
        let step = self.cfg.coarse_step as i32;

        {
            let _span = trace_span!("coarse_pass", radius = radius as u64, step = step as u64)
                .entered();
            if let Some(win) =
                SearchWindow::centered(nominal, radius, max_x as i32, max_y as i32)
            {
                scan_fn(target, template, &win, step, &mut best);
            }
            trace_event!(
                "coarse_best",
                score = best.peek().map(|c| c.score as f64).unwrap_or(f64::NAN)
            );
        }

        // Fine pass re-centers on the coarse winner, not the nominal
        // position; its radius is half a coarse step so it exactly covers
        // the gap the coarse grid skipped.
        if let Some(coarse) = best.peek() {
            let _span = trace_span!("fine_pass", radius = (step / 2) as u64).entered();
            if let Some(win) = SearchWindow::centered(
                (coarse.x, coarse.y),
                step / 2,
                max_x as i32,
                max_y as i32,
            ) {
                scan_fn(target, template, &win, 1, &mut best);
            }
        }

        match best.into_inner() {
            Some(cand) => Alignment {
                dx: nominal.0 - cand.x,
                dy: nominal.1 - cand.y,
                score: cand.score,
            },
            None => Alignment::undeterminable(),
        }
    }
}
