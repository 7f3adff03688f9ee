//! Request shape sent to the remote completion endpoint.

use serde::{Deserialize, Serialize};

/// Role names understood by the remote model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: RemoteRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: RemoteRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

/// A fully built completion request: history, instruction and sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub contents: Vec<Content>,
    pub system_instruction: String,
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    /// Remote roles in order, mostly useful for logging.
    pub fn roles(&self) -> Vec<RemoteRole> {
        self.contents.iter().map(|c| c.role).collect()
    }
}
