//! Property-based tests for vt-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use proptest::prelude::*;
use vt_math::{
    clamp_score, logistic, ols_indexed, pearson, weighted_geometric_mean, Gaussian, Moments,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

// ============================================================================
// logistic properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Monotonically non-decreasing in z for k > 0.
    #[test]
    fn logistic_monotone(a in -50.0..50.0f64, b in -50.0..50.0f64, k in 0.01..5.0f64, c in -5.0..5.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(logistic(lo, k, c) <= logistic(hi, k, c));
    }

    /// Output stays inside [0, 1] even for extreme arguments.
    #[test]
    fn logistic_bounded(z in -1e6..1e6f64, k in 0.01..10.0f64) {
        let v = logistic(z, k, 0.5);
        prop_assert!((0.0..=1.0).contains(&v), "logistic({})={}", z, v);
    }

    /// Symmetry: σ(c + d) + σ(c - d) = 1.
    #[test]
    fn logistic_symmetric(d in -20.0..20.0f64, k in 0.1..3.0f64, c in -5.0..5.0f64) {
        let sum = logistic(c + d, k, c) + logistic(c - d, k, c);
        prop_assert!((sum - 1.0).abs() < TOL);
    }
}

// ============================================================================
// geometric mean properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Equal scores collapse to that score regardless of weights.
    #[test]
    fn geometric_mean_of_constant(v in 1.0..100.0f64, w in prop::collection::vec(0.1..3.0f64, 1..8)) {
        let values = vec![v; w.len()];
        let gm = weighted_geometric_mean(&values, &w).unwrap();
        prop_assert!((gm - v).abs() < 1e-9 * v.max(1.0));
    }

    /// Result lies between the floored min and max inputs.
    #[test]
    fn geometric_mean_between_extremes(values in prop::collection::vec(0.0..100.0f64, 1..8)) {
        let weights = vec![1.0; values.len()];
        let gm = weighted_geometric_mean(&values, &weights).unwrap();
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min).max(1.0);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max).max(1.0);
        prop_assert!(gm >= lo - TOL && gm <= hi + TOL, "gm={} lo={} hi={}", gm, lo, hi);
    }

    /// A zero entry pulls the mean below the mean of the remaining entries.
    #[test]
    fn geometric_mean_zero_drags(rest in prop::collection::vec(2.0..100.0f64, 1..6), w0 in 0.1..3.0f64) {
        let rest_weights = vec![1.0; rest.len()];
        let without = weighted_geometric_mean(&rest, &rest_weights).unwrap();

        let mut values = vec![0.0];
        values.extend(&rest);
        let mut weights = vec![w0];
        weights.extend(&rest_weights);
        let with_zero = weighted_geometric_mean(&values, &weights).unwrap();

        prop_assert!(with_zero > 0.0);
        prop_assert!(with_zero < without);
    }
}

// ============================================================================
// correlation / regression properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Pearson is symmetric and bounded.
    #[test]
    fn pearson_symmetric_bounded(pairs in prop::collection::vec((0.0..100.0f64, 0.0..100.0f64), 0..30)) {
        let x: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let y: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let r_xy = pearson(&x, &y);
        let r_yx = pearson(&y, &x);
        prop_assert!((r_xy - r_yx).abs() < TOL);
        prop_assert!((-1.0..=1.0).contains(&r_xy));
        if x.len() < 3 {
            prop_assert_eq!(r_xy, 0.0);
        }
    }

    /// Pearson is invariant to positive affine transforms.
    #[test]
    fn pearson_affine_invariant(
        pairs in prop::collection::vec((0.0..100.0f64, 0.0..100.0f64), 3..30),
        scale in 0.1..10.0f64,
        shift in -50.0..50.0f64,
    ) {
        let x: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let y: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let x2: Vec<f64> = x.iter().map(|v| v * scale + shift).collect();
        prop_assert!((pearson(&x, &y) - pearson(&x2, &y)).abs() < 1e-6);
    }

    /// OLS recovers an exact line.
    #[test]
    fn ols_recovers_line(slope in -5.0..5.0f64, intercept in -50.0..50.0f64, n in 2usize..40) {
        let y: Vec<f64> = (0..n).map(|i| slope * i as f64 + intercept).collect();
        let fit = ols_indexed(&y).unwrap();
        prop_assert!((fit.slope - slope).abs() < 1e-6);
        prop_assert!((fit.intercept - intercept).abs() < 1e-6);
    }

    /// Population variance is non-negative and zero for constant samples.
    #[test]
    fn moments_nonnegative(values in prop::collection::vec(-1e3..1e3f64, 1..50)) {
        let m = Moments::of(&values).unwrap();
        prop_assert!(m.variance >= 0.0);
        prop_assert!(m.std_dev_floored(1.0) >= 1.0);
    }

    /// Posterior mean lies between the prior and likelihood means.
    #[test]
    fn fusion_mean_between(
        m1 in 0.0..100.0f64, v1 in 1.0..500.0f64,
        m2 in 0.0..100.0f64, v2 in 1.0..500.0f64,
    ) {
        let post = Gaussian::new(m1, v1).fuse(&Gaussian::new(m2, v2));
        prop_assert!(post.mean >= m1.min(m2) - TOL && post.mean <= m1.max(m2) + TOL);
        prop_assert!(post.variance <= v1.min(v2) + TOL);
    }

    /// clamp_score always lands in range.
    #[test]
    fn clamp_score_in_range(v in prop::num::f64::ANY) {
        let c = clamp_score(v);
        prop_assert!((0.0..=100.0).contains(&c));
    }
}
