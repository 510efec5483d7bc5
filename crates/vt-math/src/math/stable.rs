//! Numerically stable primitives for bounded scoring.

/// Logistic saturation `1 / (1 + e^(-k(z - c)))`.
///
/// Evaluated so that the exponential never overflows: for large positive
/// arguments the complementary form `e^x / (1 + e^x)` is used. NaN inputs
/// propagate.
pub fn logistic(z: f64, k: f64, c: f64) -> f64 {
    let x = k * (z - c);
    if x.is_nan() {
        return f64::NAN;
    }
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Clamp into `[lo, hi]`, mapping NaN to `lo`.
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.clamp(lo, hi)
}

/// Clamp into the score range `[0, 100]`.
pub fn clamp_score(value: f64) -> f64 {
    clamp_finite(value, 0.0, 100.0)
}

/// Round to the nearest integer score in `[0, 100]`.
///
/// Halves round away from zero, so `71.5` becomes `72`.
pub fn round_score(value: f64) -> u8 {
    clamp_score(value.round()) as u8
}

/// Natural log with the argument floored at `floor`.
///
/// Keeps `ln(0) = -inf` out of log-domain sums.
pub fn ln_floored(value: f64, floor: f64) -> f64 {
    if value.is_nan() {
        return floor.ln();
    }
    value.max(floor).ln()
}

/// Weighted geometric mean `exp(Σ w·ln(max(1, x)) / Σ w)`.
///
/// Every value is floored at 1 before taking the log, so a single zero
/// contributes the minimum possible term instead of collapsing the mean.
/// Entries with non-positive or non-finite weight are ignored. Returns
/// `None` when no entry carries weight.
pub fn weighted_geometric_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
    let mut log_sum = 0.0;
    let mut weight_sum = 0.0;
    for (value, weight) in values.iter().zip(weights) {
        if !weight.is_finite() || *weight <= 0.0 {
            continue;
        }
        log_sum += weight * ln_floored(*value, 1.0);
        weight_sum += weight;
    }
    if weight_sum <= 0.0 {
        return None;
    }
    Some((log_sum / weight_sum).exp())
}

/// Linear map of `x` from `[x0, x1]` onto `[y0, y1]`, clamped to the
/// output interval.
pub fn lerp_clamped(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if (x1 - x0).abs() < f64::EPSILON {
        return y0;
    }
    let t = (x - x0) / (x1 - x0);
    let y = y0 + t * (y1 - y0);
    clamp_finite(y, y0.min(y1), y0.max(y1))
}
