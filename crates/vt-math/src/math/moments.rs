//! Population moments over finite samples.

use serde::{Deserialize, Serialize};

/// Mean and population spread of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Number of finite values used.
    pub n: usize,
    pub mean: f64,
    /// Population variance (divides by `n`).
    pub variance: f64,
}

impl Moments {
    /// Compute moments over the finite entries of `values`.
    ///
    /// Returns `None` when no finite value is present.
    pub fn of(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            n: finite.len(),
            mean,
            variance,
        })
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Standard deviation floored at `floor`.
    pub fn std_dev_floored(&self, floor: f64) -> f64 {
        self.std_dev().max(floor)
    }

    /// Variance floored at `floor`.
    pub fn variance_floored(&self, floor: f64) -> f64 {
        self.variance.max(floor)
    }
}

/// Arithmetic mean; `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    Moments::of(values).map(|m| m.mean)
}

/// Population standard deviation; `0.0` for empty input.
pub fn population_std_dev(values: &[f64]) -> f64 {
    Moments::of(values).map(|m| m.std_dev()).unwrap_or(0.0)
}
