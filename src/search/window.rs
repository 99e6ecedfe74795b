//! Search window derivation and clamping.

/// Inclusive placement bounds for template-sized probes within a target.
///
/// Coordinates are top-left placement positions in target-local space, so
/// every value lies in `[0, target_dim - template_dim]` per axis. A window
/// only exists when the target can hold the template at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SearchWindow {
    pub(crate) x0: i32,
    pub(crate) x1: i32,
    pub(crate) y0: i32,
    pub(crate) y1: i32,
}

impl SearchWindow {
    /// Builds a window of `radius` around `center`, clamped to the valid
    /// placement range.
    ///
    /// `max_x`/`max_y` are the largest valid placements (`target_dim -
    /// template_dim`); a negative value means the target is smaller than the
    /// template on that axis and no placement exists. A center outside the
    /// valid range collapses that axis to its nearest clamped value rather
    /// than producing an empty scan.
    pub(crate) fn centered(
        center: (i32, i32),
        radius: i32,
        max_x: i32,
        max_y: i32,
    ) -> Option<Self> {
        if max_x < 0 || max_y < 0 {
            return None;
        }
        let (x0, x1) = clamp_axis(center.0, radius, max_x);
        let (y0, y1) = clamp_axis(center.1, radius, max_y);
        Some(Self { x0, x1, y0, y1 })
    }

    /// Number of positions probed at the given stride.
    #[cfg(test)]
    pub(crate) fn len_at(&self, step: i32) -> usize {
        let cols = ((self.x1 - self.x0) / step + 1) as usize;
        let rows = ((self.y1 - self.y0) / step + 1) as usize;
        cols * rows
    }
}

fn clamp_axis(center: i32, radius: i32, max: i32) -> (i32, i32) {
    let lo = center.saturating_sub(radius).clamp(0, max);
    let hi = center.saturating_add(radius).clamp(0, max);
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::SearchWindow;

    #[test]
    fn window_clamps_to_valid_placements() {
        let win = SearchWindow::centered((10, 10), 50, 30, 30).unwrap();
        assert_eq!(win, SearchWindow { x0: 0, x1: 30, y0: 0, y1: 30 });
    }

    #[test]
    fn center_outside_range_collapses_to_edge() {
        let win = SearchWindow::centered((200, -90), 5, 30, 30).unwrap();
        assert_eq!(win, SearchWindow { x0: 30, x1: 30, y0: 0, y1: 0 });
    }

    #[test]
    fn target_smaller_than_template_has_no_window() {
        assert!(SearchWindow::centered((0, 0), 5, -1, 10).is_none());
        assert!(SearchWindow::centered((0, 0), 5, 10, -3).is_none());
    }

    #[test]
    fn stride_grid_counts_positions() {
        let win = SearchWindow::centered((25, 25), 24, 100, 100).unwrap();
        // 1..=49 at stride 8: positions 1, 9, ..., 49.
        assert_eq!(win.len_at(8), 7 * 7);
        assert_eq!(win.len_at(1), 49 * 49);
    }
}
