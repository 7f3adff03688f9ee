//! Gemini API client struct, request building, and response parsing.

use tracing::debug;

use crate::request::CompletionRequest;
use crate::AiError;

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::Setup(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn api_url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        format!(
            "{}/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": request.contents,
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "generationConfig": {
                "temperature": request.sampling.temperature,
                "topP": request.sampling.top_p,
                "topK": request.sampling.top_k,
            }
        })
    }

    /// Parse a Gemini response into its generated text.
    ///
    /// A response without candidates (e.g. a blocked prompt) yields an
    /// empty string.
    pub(crate) fn parse_response(&self, json: &serde_json::Value) -> Result<String, AiError> {
        if let Some(message) = error_message(json) {
            return Err(AiError::ApiError(message));
        }
        if json["candidates"].as_array().map_or(true, |c| c.is_empty()) {
            debug!(
                block_reason = json["promptFeedback"]["blockReason"].as_str().unwrap_or("none"),
                "Gemini response has no candidates"
            );
        }
        Ok(candidate_text(json))
    }
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn candidate_text(json: &serde_json::Value) -> String {
    let mut content = String::new();
    if let Some(parts) = json["candidates"][0]["content"]["parts"].as_array() {
        for part in parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }
    }
    content
}

/// Extract an in-band `error` object, if the payload carries one.
pub(crate) fn error_message(json: &serde_json::Value) -> Option<String> {
    let error = json.get("error")?;
    let message = error["message"].as_str().unwrap_or("unknown error");
    Some(match error["code"].as_u64() {
        Some(code) => format!("{code}: {message}"),
        None => message.to_string(),
    })
}
