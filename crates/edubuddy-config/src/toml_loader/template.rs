//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# EduBuddy Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[gemini]
# model = "gemini-3-flash-preview"
# api_key_env = "API_KEY"      # environment variable holding the API key
# stream = true                # print replies as they arrive
# connect_timeout_secs = 10    # 1-60
# request_timeout_secs = 120   # 1-600

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
}
