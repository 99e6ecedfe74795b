//! Batch alignment driver.
//!
//! One template region, many targets. Each target gets an independent
//! accept/reject decision against the configured similarity threshold;
//! targets never influence each other, which is what makes the parallel
//! path a pure optimization.

use crate::image::{PixelSource, SelectionProvider};
use crate::search::{AlignConfig, Aligner};
use crate::trace::trace_event;
use crate::util::{AlignError, AlignResult};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Per-target outcome, in input order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Decision {
    /// The match cleared the threshold; apply `(dx, dy)` to the target.
    Accepted {
        /// Horizontal shift to apply.
        dx: i32,
        /// Vertical shift to apply.
        dy: i32,
        /// Similarity of the accepted match.
        score: f32,
    },
    /// The match fell at or below the threshold; leave the target untouched.
    Rejected {
        /// Best similarity observed, kept for diagnostics.
        score: f32,
    },
}

impl Decision {
    /// True for accepted alignments.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }

    /// The similarity score behind this decision.
    pub fn score(&self) -> f32 {
        match self {
            Decision::Accepted { score, .. } | Decision::Rejected { score } => *score,
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, PartialEq)]
pub struct BatchReport {
    /// One decision per processed target, in input order. Shorter than the
    /// target list only when the run was cancelled.
    pub decisions: Vec<Decision>,
    /// Number of accepted alignments; the caller uses this to decide on a
    /// follow-up canvas refit.
    pub accepted: usize,
}

/// Aligns every target against one template region of the reference image.
///
/// Hard-stop preconditions, checked before any alignment work: the config
/// must validate, the selection provider must yield a non-degenerate
/// template region ([`AlignError::NoSelection`]), and at least one target
/// must be supplied ([`AlignError::InsufficientTargets`]). Per-target
/// failures are never hard stops; a target that cannot be matched simply
/// comes back rejected with its observed score.
///
/// With the `rayon` feature and `cfg.parallel`, targets are aligned
/// concurrently; decisions still come back in input order and are identical
/// to a serial run.
pub fn align_batch<R, P, T>(
    reference: &R,
    selection: &P,
    targets: &[T],
    cfg: &AlignConfig,
) -> AlignResult<BatchReport>
where
    R: PixelSource,
    P: SelectionProvider,
    T: PixelSource + Sync,
{
    let aligner = prepare(reference, selection, targets, cfg)?;

    #[cfg(feature = "rayon")]
    let decisions: Vec<Decision> = if cfg.parallel {
        targets
            .par_iter()
            .map(|target| decide(&aligner, target))
            .collect()
    } else {
        targets.iter().map(|t| decide(&aligner, t)).collect()
    };

    #[cfg(not(feature = "rayon"))]
    let decisions: Vec<Decision> = targets.iter().map(|t| decide(&aligner, t)).collect();

    Ok(report(decisions))
}

/// Serial batch run with a cooperative cancellation check between targets.
///
/// `cancel` is polled before each target; once it returns true the run
/// stops and the report covers only the targets already decided. Decisions
/// already made stand, matching the driver's per-target commit model.
pub fn align_batch_with<R, P, T>(
    reference: &R,
    selection: &P,
    targets: &[T],
    cfg: &AlignConfig,
    cancel: impl Fn() -> bool,
) -> AlignResult<BatchReport>
where
    R: PixelSource,
    P: SelectionProvider,
    T: PixelSource + Sync,
{
    let aligner = prepare(reference, selection, targets, cfg)?;

    let mut decisions = Vec::with_capacity(targets.len());
    for target in targets {
        if cancel() {
            trace_event!("batch_cancelled", done = decisions.len());
            break;
        }
        decisions.push(decide(&aligner, target));
    }
    Ok(report(decisions))
}

fn prepare<R, P, T>(
    reference: &R,
    selection: &P,
    targets: &[T],
    cfg: &AlignConfig,
) -> AlignResult<Aligner>
where
    R: PixelSource,
    P: SelectionProvider,
    T: PixelSource,
{
    cfg.validate()?;
    let region = selection.selection().ok_or(AlignError::NoSelection)?;
    if region.width == 0 || region.height == 0 {
        return Err(AlignError::NoSelection);
    }
    if targets.is_empty() {
        return Err(AlignError::InsufficientTargets { got: targets.len() });
    }
    Ok(Aligner::new(reference, region).with_config(*cfg))
}

fn decide<T: PixelSource>(aligner: &Aligner, target: &T) -> Decision {
    let result = aligner.align(target);
    if result.score > aligner.config().min_overlap {
        Decision::Accepted {
            dx: result.dx,
            dy: result.dy,
            score: result.score,
        }
    } else {
        Decision::Rejected {
            score: result.score,
        }
    }
}

fn report(decisions: Vec<Decision>) -> BatchReport {
    let accepted = decisions.iter().filter(|d| d.is_accepted()).count();
    trace_event!("batch_done", targets = decisions.len(), accepted = accepted);
    BatchReport {
        decisions,
        accepted,
    }
}
