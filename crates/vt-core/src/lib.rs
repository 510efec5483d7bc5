//! Vitals Core Library
//!
//! This library provides the scoring and inference engine:
//! - Rolling snapshot archive with pluggable persistence
//! - Trailing-window baselines and z-scores
//! - Per-domain scoring and the composite system score
//! - Bayesian imputation of missing days
//! - Correlation matrix, strongest pairs and standardized regression
//! - Linear forecasts and goal probability
//! - Adaptive calorie and macro targets
//! - Exit codes and structured logging for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod baseline;
pub mod correlation;
pub mod exit_codes;
pub mod forecast;
pub mod impute;
pub mod logging;
pub mod pipeline;
pub mod scoring;
pub mod store;
pub mod targets;
