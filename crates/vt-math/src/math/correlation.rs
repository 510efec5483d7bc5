//! Pearson product-moment correlation.

/// Minimum paired observations for a defined correlation.
pub const MIN_PAIRED_POINTS: usize = 3;

/// Pearson correlation of two equally long series.
///
/// Returns exactly `0.0` instead of NaN when the lengths differ, fewer than
/// [`MIN_PAIRED_POINTS`] pairs exist, or either series has zero variance.
/// The result is clamped to `[-1, 1]` to absorb rounding noise.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < MIN_PAIRED_POINTS {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if !denom.is_finite() || denom == 0.0 {
        return 0.0;
    }
    let r = cov / denom;
    if r.is_nan() {
        return 0.0;
    }
    r.clamp(-1.0, 1.0)
}
