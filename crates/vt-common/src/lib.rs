//! Vitals common types and errors.
//!
//! This crate provides foundational types shared across vt-core modules:
//! - Tracked metrics and daily score snapshots
//! - Raw daily logs and the user profile contract
//! - Boundary validation for caller input
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod input;
pub mod logs;
pub mod metric;
pub mod output;
pub mod snapshot;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use input::{parse_measurement, Validate};
pub use logs::{
    DailyLogs, Gender, LearningLog, Meal, NutritionLog, ScreenLog, SleepLog, TrainingLog,
    UserProfile, WeightEntry,
};
pub use metric::Metric;
pub use output::OutputFormat;
pub use snapshot::{parse_date, DailySnapshot};
