//! Normalized cross-correlation between luminance buffers.

use crate::luma::LumaBuffer;

/// Computes the normalized cross-correlation of two luminance buffers.
///
/// The score is the Pearson correlation of the zero-meaned samples, bounded
/// to `[-1, 1]` up to floating-point rounding. Two degenerate cases return
/// exactly `0.0` rather than failing: a shape mismatch (a legitimate
/// "no match" signal when probing edge-clamped windows) and a constant
/// buffer on either side (no variance to correlate).
pub fn ncc(a: &LumaBuffer, b: &LumaBuffer) -> f32 {
    if a.width() != b.width() || a.height() != b.height() {
        return 0.0;
    }

    let xs = a.samples();
    let ys = b.samples();
    let n = xs.len() as f64;

    let mean_x: f64 = xs.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_y: f64 = ys.iter().map(|&v| v as f64).sum::<f64>() / n;

    let mut cross = 0.0f64;
    let mut var_x = 0.0f64;
    let mut var_y = 0.0f64;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x as f64 - mean_x;
        let dy = y as f64 - mean_y;
        cross += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }

    (cross / (var_x * var_y).sqrt()) as f32
}
