//! Structured event definitions for logging.
//!
//! Every engine event carries a stable `event` name from [`event_names`]
//! and the pipeline [`Stage`] it belongs to, so JSON log lines can be
//! filtered without parsing messages.

use serde::{Deserialize, Serialize};

/// Processing stages in the vitals pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup, argument parsing and configuration.
    Init,
    /// Boundary validation of caller logs and profile.
    Ingest,
    /// Per-domain and composite scoring.
    Score,
    /// Snapshot archive reads and writes.
    Store,
    /// Trailing-window baseline estimation.
    Baseline,
    /// Missing-day inference.
    Impute,
    /// Correlation matrix and regression.
    Correlate,
    /// Trend extrapolation and goal probability.
    Forecast,
    /// Adaptive calorie and macro targets.
    Targets,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Ingest => "ingest",
            Stage::Score => "score",
            Stage::Store => "store",
            Stage::Baseline => "baseline",
            Stage::Impute => "impute",
            Stage::Correlate => "correlate",
            Stage::Forecast => "forecast",
            Stage::Targets => "targets",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Ingest and scoring
    pub const INPUT_REJECTED: &str = "input.rejected";
    pub const SCORE_RECOMPUTED: &str = "score.recomputed";

    // Archive
    pub const STORE_OPENED: &str = "store.opened";
    pub const STORE_UPSERTED: &str = "store.upserted";
    pub const STORE_EVICTED: &str = "store.evicted";

    // Estimators
    pub const BASELINE_FALLBACK: &str = "baseline.fallback";
    pub const IMPUTE_FALLBACK: &str = "impute.fallback";
    pub const IMPUTE_GAP_FILLED: &str = "impute.gap_filled";
    pub const FORECAST_INSUFFICIENT: &str = "forecast.insufficient";
    pub const REGRESSION_INSUFFICIENT: &str = "regression.insufficient";
    pub const TARGETS_COMPUTED: &str = "targets.computed";

    // Error events
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Correlation context shared by every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Subcommand being executed, when known.
    pub command: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            command: None,
        }
    }

    /// Set the subcommand name.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context() {
        let ctx = LogContext::new("run-abc").with_command("score");
        assert_eq!(ctx.run_id, "run-abc");
        assert_eq!(ctx.command.as_deref(), Some("score"));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Score.to_string(), "score");
        assert_eq!(Stage::Impute.to_string(), "impute");
        assert_eq!(Stage::Correlate.to_string(), "correlate");
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&Stage::Store).unwrap(), "\"store\"");
        assert_eq!(
            serde_json::to_string(&Stage::Forecast).unwrap(),
            "\"forecast\""
        );
    }

    #[test]
    fn test_event_names() {
        assert_eq!(event_names::RUN_STARTED, "run.started");
        assert_eq!(event_names::STORE_EVICTED, "store.evicted");
        assert_eq!(event_names::SCORE_RECOMPUTED, "score.recomputed");
    }
}
