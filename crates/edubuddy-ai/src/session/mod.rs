//! Conversation sessions.
//!
//! A `SessionDirectory` holds every session of the process and tracks the
//! active one; a `Conversation` appends user turns to it, asks the model
//! for a reply and records the reply, one request at a time.

mod conversation;
mod directory;
mod types;

#[cfg(test)]
mod tests;

pub use conversation::Conversation;
pub use directory::SessionDirectory;
pub use types::{
    derive_title, ChatSession, IgnoreReason, SessionError, SubmitOutcome, PLACEHOLDER_TITLE,
    TITLE_MAX_CHARS,
};
