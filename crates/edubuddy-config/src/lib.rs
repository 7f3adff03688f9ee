//! EduBuddy configuration system.
//!
//! Provides TOML-based configuration with full validation. All config
//! sections use sensible defaults so partial configs work out of the box.
//! The only value that must come from outside the file is the API key,
//! which is read from the process environment.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use edubuddy_config::{api_key, load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! let key = api_key(&config).expect("API key not set");
//! println!("{}", config_to_json(&config));
//! # let _ = key;
//! ```

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::api_key;
pub use schema::{EduBuddyConfig, CONFIG_SCHEMA_VERSION};

use edubuddy_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creates a default
/// if none exists, and validates the result.
pub fn load_config() -> Result<EduBuddyConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<EduBuddyConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &EduBuddyConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
