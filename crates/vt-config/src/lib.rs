//! Vitals configuration loading and validation.
//!
//! This crate provides:
//! - Typed tunables for every scoring and inference constant
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - JSON schema export for the tunables file

pub mod resolve;
pub mod tunables;
pub mod validate;

pub use resolve::{default_archive_path, load_tunables, resolve_tunables_path, ConfigSource, LoadedTunables};
pub use tunables::Tunables;
pub use validate::{validate_tunables, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// JSON schema describing the tunables file.
pub fn tunables_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(Tunables);
    serde_json::to_value(&schema).unwrap_or(serde_json::Value::Null)
}
