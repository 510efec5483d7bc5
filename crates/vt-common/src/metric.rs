//! Tracked metrics: the five life domains plus the composite system score.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A tracked score series.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cognitive load from active and passive learning.
    Learning,
    /// Screen exposure by category.
    Screen,
    /// Macro balance, fat and protein quality, hydration.
    Nutrition,
    /// Physical training volume.
    Training,
    /// Sleep duration, quality and naps.
    Sleep,
    /// Weighted geometric mean of the five domains.
    System,
}

impl Metric {
    /// Every tracked metric, domains first.
    pub const ALL: [Metric; 6] = [
        Metric::Learning,
        Metric::Screen,
        Metric::Nutrition,
        Metric::Training,
        Metric::Sleep,
        Metric::System,
    ];

    /// The five life domains (no composite).
    pub const DOMAINS: [Metric; 5] = [
        Metric::Learning,
        Metric::Screen,
        Metric::Nutrition,
        Metric::Training,
        Metric::Sleep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Learning => "learning",
            Metric::Screen => "screen",
            Metric::Nutrition => "nutrition",
            Metric::Training => "training",
            Metric::Sleep => "sleep",
            Metric::System => "system",
        }
    }

    pub fn is_domain(&self) -> bool {
        !matches!(self, Metric::System)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "learning" => Ok(Metric::Learning),
            "screen" => Ok(Metric::Screen),
            "nutrition" => Ok(Metric::Nutrition),
            "training" => Ok(Metric::Training),
            "sleep" => Ok(Metric::Sleep),
            "system" => Ok(Metric::System),
            _ => Err(format!("unknown metric: {}", s)),
        }
    }
}
