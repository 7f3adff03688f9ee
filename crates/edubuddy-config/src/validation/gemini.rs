//! Remote model section validation.

use super::helpers::{validate_env_var_name, validate_non_empty, validate_range};
use crate::schema::EduBuddyConfig;

pub(crate) fn validate_gemini(errors: &mut Vec<String>, config: &EduBuddyConfig) {
    let gemini = &config.gemini;
    validate_non_empty(errors, "gemini.model", &gemini.model);
    validate_env_var_name(errors, "gemini.api_key_env", &gemini.api_key_env);
    validate_range(
        errors,
        "gemini.connect_timeout_secs",
        gemini.connect_timeout_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "gemini.request_timeout_secs",
        gemini.request_timeout_secs,
        1,
        600,
    );
}
