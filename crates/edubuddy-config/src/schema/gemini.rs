//! Remote model configuration types.

use serde::{Deserialize, Serialize};

/// Model used when the config does not name one.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Environment variable holding the API key unless overridden.
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

/// Gemini completion endpoint settings.
///
/// Sampling parameters are not configurable; they are fixed by the
/// prompt adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSection {
    pub model: String,
    /// Name of the environment variable that holds the API key.
    pub api_key_env: String,
    /// Render replies incrementally as they stream in.
    pub stream: bool,
    pub connect_timeout_secs: u32,
    pub request_timeout_secs: u32,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            stream: true,
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}
