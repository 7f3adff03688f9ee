//! CompletionClient trait implementation for GeminiClient (generate + streaming).

use async_trait::async_trait;
use tracing::debug;

use crate::request::CompletionRequest;
use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiError, ChunkHandler, CompletionClient};

use super::client::{candidate_text, error_message, GeminiClient};

impl GeminiClient {
    async fn post(&self, url: &str, request: &CompletionRequest) -> Result<reqwest::Response, AiError> {
        let body = self.build_request_body(request);

        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }
        Ok(response)
    }
}

/// Map a non-success HTTP status to an error.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> AiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        AiError::RateLimited
    } else {
        AiError::ApiError(format!("HTTP {status}: {body}"))
    }
}

/// Folds streamed SSE events into the full reply text.
#[derive(Debug, Default)]
pub(crate) struct StreamState {
    content: String,
    error: Option<String>,
}

impl StreamState {
    /// Handle one event, forwarding any new text to `on_chunk`.
    pub(crate) fn push_event(&mut self, event: &SseEvent, on_chunk: &(dyn Fn(String) + Send + Sync)) {
        let data = match serde_json::from_str::<serde_json::Value>(&event.data) {
            Ok(data) => data,
            Err(e) => {
                debug!("skipping undecodable SSE event: {e}");
                return;
            }
        };

        if let Some(message) = error_message(&data) {
            self.error.get_or_insert(message);
            return;
        }

        let chunk = candidate_text(&data);
        if !chunk.is_empty() {
            self.content.push_str(&chunk);
            on_chunk(chunk);
        }
    }

    /// The full text, or the first in-band error the stream carried.
    pub(crate) fn finish(self) -> Result<String, AiError> {
        match self.error {
            Some(message) => Err(AiError::ApiError(message)),
            None => Ok(self.content),
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, AiError> {
        let url = self.api_url(false);

        debug!(
            model = %self.config.model,
            turns = request.contents.len(),
            "Gemini API request"
        );

        let response = self.post(&url, request).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(&json)
    }

    async fn generate_streaming(
        &self,
        request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<String, AiError> {
        let url = format!("{}?alt=sse", self.api_url(true));

        debug!(
            model = %self.config.model,
            turns = request.contents.len(),
            "Gemini API streaming request"
        );

        let response = self.post(&url, request).await?;

        let mut state = StreamState::default();
        parse_sse_stream(response, |event: SseEvent| state.push_event(&event, &*on_chunk)).await?;
        state.finish()
    }
}
