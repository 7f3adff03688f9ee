//! Full configuration validation.
//!
//! Validates numeric ranges and string formats. Each section has its own
//! validator; this orchestrator calls them all and collects errors into a
//! single `ConfigError`.

mod gemini;
mod helpers;


use crate::schema::EduBuddyConfig;
use edubuddy_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &EduBuddyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    gemini::validate_gemini(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
