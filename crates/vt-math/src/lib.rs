//! Vitals math utilities.

pub mod math;

pub use math::correlation::{pearson, MIN_PAIRED_POINTS};
pub use math::gaussian::Gaussian;
pub use math::moments::{mean, population_std_dev, Moments};
pub use math::regression::{ols, ols_indexed, LinearFit};
pub use math::stable::*;
