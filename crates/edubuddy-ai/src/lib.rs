//! AI engine for EduBuddy.
//!
//! Provides the study assistant's conversation core:
//! - Message and session model
//! - Prompt construction per study mode
//! - Gemini completion client with streaming (SSE) support
//! - A session directory and a single-request conversation controller

pub mod gemini;
pub mod mode;
pub mod prompt;
pub mod request;
pub mod session;
pub mod streaming;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use edubuddy_common::MessageId;

pub use gemini::{GeminiClient, GeminiConfig};
pub use mode::StudyMode;
pub use request::{CompletionRequest, Content, Part, RemoteRole, SamplingParams};
pub use session::{
    ChatSession, Conversation, IgnoreReason, SessionDirectory, SessionError, SubmitOutcome,
};

/// Callback receiving streamed text chunks.
pub type ChunkHandler = Box<dyn Fn(String) + Send + Sync>;

/// A hosted model that turns a request into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, AiError>;

    /// Generate while reporting text as it arrives. Returns the full text.
    ///
    /// Clients without a streaming transport deliver the whole reply as a
    /// single chunk.
    async fn generate_streaming(
        &self,
        request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<String, AiError> {
        let text = self.generate(request).await?;
        if !text.is_empty() {
            on_chunk(text.clone());
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
    #[error("Client setup error: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else if e.is_decode() {
            AiError::ParseError(e.to_string())
        } else {
            AiError::NetworkError(e.to_string())
        }
    }
}
