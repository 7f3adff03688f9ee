//! Session types and concurrency guards.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use edubuddy_common::SessionId;
use serde::{Deserialize, Serialize};

use crate::{Message, Role};

/// Title given to a session before its first user message.
pub const PLACEHOLDER_TITLE: &str = "New Study Session";

/// Number of characters kept when deriving a title.
pub const TITLE_MAX_CHARS: usize = 30;

/// Derive a session title from the first user message.
///
/// Keeps the first 30 characters and marks truncation with `...`.
pub fn derive_title(text: &str) -> String {
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// A named, ordered collection of turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    id: SessionId,
    title: String,
    messages: Vec<Message>,
    last_updated: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Append a message. The first user message of a session names it.
    pub(crate) fn push(&mut self, message: Message) {
        let was_empty = self.messages.is_empty();
        let names_session = was_empty && message.role() == Role::User;
        if names_session {
            self.title = derive_title(message.content());
        }
        self.messages.push(message);
        self.last_updated = Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(SessionId),
}

/// Why a submission was dropped without touching any session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    Busy,
}

/// Result of submitting user text.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    /// The model replied; `reply` was appended to `session_id`.
    Answered { session_id: SessionId, reply: Message },
    /// The remote call failed; the apology `reply` was appended instead.
    Failed { session_id: SessionId, reply: Message },
}

impl SubmitOutcome {
    pub fn reply(&self) -> Option<&Message> {
        match self {
            SubmitOutcome::Ignored(_) => None,
            SubmitOutcome::Answered { reply, .. } | SubmitOutcome::Failed { reply, .. } => {
                Some(reply)
            }
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, SubmitOutcome::Ignored(_))
    }
}

/// Guard that clears the `busy` flag on drop, ensuring it is always released
/// even if the future is cancelled or an early return occurs.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to take the busy flag. Returns `None` if a request is in flight.
    pub(crate) fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
