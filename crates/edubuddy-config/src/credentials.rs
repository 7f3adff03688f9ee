//! API key lookup from the process environment.

use edubuddy_common::ConfigError;

use crate::schema::EduBuddyConfig;

/// Read the API key from the environment variable named in the config.
///
/// An unset or blank variable is reported as `MissingCredential`.
pub fn api_key(config: &EduBuddyConfig) -> Result<String, ConfigError> {
    api_key_from_env(&config.gemini.api_key_env)
}

fn api_key_from_env(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(var.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_key_from_named_variable() {
        std::env::set_var("EDUBUDDY_TEST_KEY_PRESENT", "  secret-key  ");
        let mut config = EduBuddyConfig::default();
        config.gemini.api_key_env = "EDUBUDDY_TEST_KEY_PRESENT".into();

        assert_eq!(api_key(&config).unwrap(), "secret-key");
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let err = api_key_from_env("EDUBUDDY_TEST_KEY_NEVER_SET").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ref v) if v == "EDUBUDDY_TEST_KEY_NEVER_SET"));
    }

    #[test]
    fn blank_variable_counts_as_missing() {
        std::env::set_var("EDUBUDDY_TEST_KEY_BLANK", "   ");
        let err = api_key_from_env("EDUBUDDY_TEST_KEY_BLANK").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(_)));
    }
}
