//! Logging configuration.
//!
//! Level precedence, highest first:
//! 1. `-v` / `-q` on the command line
//! 2. `VITALS_LOG` (a single level name)
//! 3. `RUST_LOG` (full filter directives, used verbatim)
//! 4. `info`
//!
//! Format comes from `--log-format`, then `VITALS_LOG_FORMAT`, then human.

use serde::{Deserialize, Serialize};

pub const ENV_LOG_LEVEL: &str = "VITALS_LOG";
pub const ENV_LOG_FORMAT: &str = "VITALS_LOG_FORMAT";
pub const ENV_LOG_DIRECTIVES: &str = "RUST_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line on stderr.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

/// Raw logging variables read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct LogEnv {
    pub level: Option<String>,
    pub format: Option<String>,
    pub directives: Option<String>,
}

impl LogEnv {
    pub fn capture() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        LogEnv {
            level: read(ENV_LOG_LEVEL),
            format: read(ENV_LOG_FORMAT),
            directives: read(ENV_LOG_DIRECTIVES),
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// `RUST_LOG` directives; only set when no explicit level was given.
    pub directives: Option<String>,
}

impl LogConfig {
    /// Resolve against the current process environment.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(cli_level, cli_format, &LogEnv::capture())
    }

    pub fn resolve(
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
        env: &LogEnv,
    ) -> Self {
        let explicit = cli_level.or_else(|| env.level.as_deref().and_then(|v| v.parse().ok()));
        let format = cli_format
            .or_else(|| env.format.as_deref().and_then(|v| v.parse().ok()))
            .unwrap_or_default();

        match explicit {
            Some(level) => LogConfig {
                format,
                level,
                directives: None,
            },
            None => LogConfig {
                format,
                level: LogLevel::Info,
                directives: env.directives.clone(),
            },
        }
    }

    /// Level selected by the `-v` / `-q` flags.
    pub fn level_for_verbosity(verbose: u8, quiet: bool) -> LogLevel {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Whether human output carries file and line (trace level only).
    pub fn source_location(&self) -> bool {
        self.level == LogLevel::Trace
    }
}
