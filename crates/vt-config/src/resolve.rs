//! Configuration resolution and loading.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::tunables::Tunables;
use crate::validate::{validate_tunables, ValidationError, ValidationResult};

/// Where the tunables file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "VITALS_CONFIG";
pub const ENV_CONFIG_DIR: &str = "VITALS_CONFIG_DIR";

/// Standard config file name.
const TUNABLES_FILENAME: &str = "tunables.json";

/// Snapshot archive file name.
const ARCHIVE_FILENAME: &str = "archive.json";

/// Application name for XDG directories.
const APP_NAME: &str = "vitals";

/// Tunables together with their provenance.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedTunables {
    pub tunables: Tunables,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
    /// SHA-256 of the file content (None for built-in defaults).
    pub hash: Option<String>,
}

/// Resolve the tunables path.
///
/// 1. Explicit CLI path (returned even if missing, so loading reports it)
/// 2. `VITALS_CONFIG` (direct path)
/// 3. `VITALS_CONFIG_DIR` + `tunables.json`
/// 4. XDG config directory (`~/.config/vitals/tunables.json`)
/// 5. Built-in defaults (None)
pub fn resolve_tunables_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(TUNABLES_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(TUNABLES_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    (None, ConfigSource::BuiltinDefault)
}

/// Get the XDG config directory for vitals.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Default snapshot archive location (`~/.local/share/vitals/archive.json`).
pub fn default_archive_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_NAME).join(ARCHIVE_FILENAME))
}

/// Resolve, read, parse, and validate the tunables.
pub fn load_tunables(cli_path: Option<&Path>) -> ValidationResult<LoadedTunables> {
    let (path, source) = resolve_tunables_path(cli_path);
    let Some(path) = path else {
        return Ok(LoadedTunables {
            tunables: Tunables::default(),
            path: None,
            source,
            hash: None,
        });
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let tunables = Tunables::from_json(&content)?;
    validate_tunables(&tunables)?;

    Ok(LoadedTunables {
        tunables,
        path: Some(path),
        source,
        hash: Some(content_hash(&content)),
    })
}

/// Hex SHA-256 of a config file's content.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
