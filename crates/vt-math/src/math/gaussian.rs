//! Conjugate Gaussian updates in precision form.

use serde::{Deserialize, Serialize};

/// A normal belief `N(mean, variance)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    pub mean: f64,
    pub variance: f64,
}

impl Gaussian {
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    /// Inverse variance. Infinite for a degenerate (zero-variance) belief.
    pub fn precision(&self) -> f64 {
        1.0 / self.variance
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Precision-weighted fusion with an independent Gaussian likelihood.
    ///
    /// `posterior_precision = 1/σ²_prior + 1/σ²_like` and the posterior mean
    /// is the precision-weighted average of the two means. Both variances
    /// must be positive; callers floor them before fusing.
    pub fn fuse(&self, likelihood: &Gaussian) -> Gaussian {
        let prior_precision = self.precision();
        let likelihood_precision = likelihood.precision();
        let posterior_precision = prior_precision + likelihood_precision;
        let mean = (prior_precision * self.mean + likelihood_precision * likelihood.mean)
            / posterior_precision;
        Gaussian {
            mean,
            variance: 1.0 / posterior_precision,
        }
    }
}
