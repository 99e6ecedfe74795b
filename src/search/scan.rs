//! Grid scan over a search window with best-candidate tracking.

use crate::image::{PixelSource, Rect};
use crate::luma::LumaBuffer;
use crate::score::ncc;
use crate::search::window::SearchWindow;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A scored template placement in target-local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) score: f32,
}

/// Returns true when `a` ranks ahead of `b`.
///
/// Ties break toward lower y then lower x so that serial and parallel scans
/// agree on the winner regardless of evaluation order.
fn ranks_ahead(a: &Candidate, b: &Candidate) -> bool {
    match a.score.total_cmp(&b.score) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => (a.y, a.x) < (b.y, b.x),
    }
}

/// Running best-candidate accumulator, carried across search passes.
#[derive(Default)]
pub(crate) struct Best {
    inner: Option<Candidate>,
}

impl Best {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Folds a candidate into the running best.
    pub(crate) fn observe(&mut self, cand: Candidate) {
        match &self.inner {
            Some(current) if !ranks_ahead(&cand, current) => {}
            _ => self.inner = Some(cand),
        }
    }

    /// Current best, if any candidate was ever observed.
    pub(crate) fn peek(&self) -> Option<Candidate> {
        self.inner
    }

    pub(crate) fn into_inner(self) -> Option<Candidate> {
        self.inner
    }
}

/// Scores one placement, or skips it when the region cannot be read.
///
/// Extraction failures rank as unusable (no candidate), never as a zero
/// score, so a broken read cannot win over a genuine low-similarity match.
fn score_at<T: PixelSource>(target: &T, template: &LumaBuffer, x: i32, y: i32) -> Option<Candidate> {
    let rect = Rect::new(x, y, template.width(), template.height()).ok()?;
    let probe = LumaBuffer::from_source(target, rect).ok()?;
    Some(Candidate {
        x,
        y,
        score: ncc(template, &probe),
    })
}

/// Scans a window at the given stride, folding every scored placement into
/// `best`. Stride applies to both axes, walking from the low corner; the
/// high edge is probed only when the span is a stride multiple.
pub(crate) fn scan_window<T: PixelSource>(
    target: &T,
    template: &LumaBuffer,
    win: &SearchWindow,
    step: i32,
    best: &mut Best,
) {
    debug_assert!(step > 0);
    let mut y = win.y0;
    while y <= win.y1 {
        let mut x = win.x0;
        while x <= win.x1 {
            if let Some(cand) = score_at(target, template, x, y) {
                best.observe(cand);
            }
            x += step;
        }
        y += step;
    }
}

/// Row-parallel variant of [`scan_window`].
///
/// Each grid row is reduced to its best candidate independently; the row
/// winners are folded into `best` in row order, which together with the
/// deterministic tie-breaking makes the result identical to the serial scan.
#[cfg(feature = "rayon")]
pub(crate) fn scan_window_par<T: PixelSource + Sync>(
    target: &T,
    template: &LumaBuffer,
    win: &SearchWindow,
    step: i32,
    best: &mut Best,
) {
    debug_assert!(step > 0);
    let rows: Vec<i32> = (win.y0..=win.y1).step_by(step as usize).collect();
    let row_winners: Vec<Option<Candidate>> = rows
        .par_iter()
        .map(|&y| {
            let mut row_best = Best::new();
            let mut x = win.x0;
            while x <= win.x1 {
                if let Some(cand) = score_at(target, template, x, y) {
                    row_best.observe(cand);
                }
                x += step;
            }
            row_best.into_inner()
        })
        .collect();

    for cand in row_winners.into_iter().flatten() {
        best.observe(cand);
    }
}

#[cfg(test)]
mod tests {
    use super::{ranks_ahead, Best, Candidate};

    #[test]
    fn best_prefers_higher_score() {
        let mut best = Best::new();
        best.observe(Candidate { x: 5, y: 5, score: 0.3 });
        best.observe(Candidate { x: 1, y: 1, score: 0.9 });
        best.observe(Candidate { x: 2, y: 2, score: 0.5 });
        assert_eq!(best.into_inner().unwrap().score, 0.9);
    }

    #[test]
    fn ties_break_toward_scan_order() {
        let early = Candidate { x: 3, y: 1, score: 0.5 };
        let late = Candidate { x: 0, y: 2, score: 0.5 };
        assert!(ranks_ahead(&early, &late));
        assert!(!ranks_ahead(&late, &early));

        let mut best = Best::new();
        best.observe(late);
        best.observe(early);
        assert_eq!(best.into_inner().unwrap(), early);
    }

    #[test]
    fn empty_scan_yields_no_candidate() {
        assert!(Best::new().into_inner().is_none());
    }
}
