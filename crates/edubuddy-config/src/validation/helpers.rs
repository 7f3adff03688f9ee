//! Shared validation helpers.

use regex::Regex;
use std::sync::LazyLock;

static ENV_VAR_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Push an error if `value` is outside `[min, max]` (integer).
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is empty or whitespace.
pub(crate) fn validate_non_empty(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}

/// Push an error if `value` is not a usable environment variable name.
pub(crate) fn validate_env_var_name(errors: &mut Vec<String>, name: &str, value: &str) {
    if !ENV_VAR_NAME_RE.is_match(value) {
        errors.push(format!("{name} = {value:?} is not a valid environment variable name"));
    }
}
