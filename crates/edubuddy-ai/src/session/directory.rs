//! In-memory list of sessions with one active session.

use edubuddy_common::SessionId;
use tracing::info;

use crate::Message;

use super::types::{ChatSession, SessionError};

/// All sessions of the running process, newest first.
///
/// There is always exactly one active session.
#[derive(Debug, Clone)]
pub struct SessionDirectory {
    sessions: Vec<ChatSession>,
    active: usize,
}

impl SessionDirectory {
    /// Create a directory holding a single empty, active session.
    pub fn new() -> Self {
        Self {
            sessions: vec![ChatSession::new()],
            active: 0,
        }
    }

    /// Create an empty session and make it active. Existing sessions stay listed.
    pub fn create_session(&mut self) -> &ChatSession {
        self.sessions.insert(0, ChatSession::new());
        self.active = 0;
        info!(session = %self.sessions[0].id(), "created session");
        &self.sessions[0]
    }

    /// Make the session with `id` active.
    pub fn select_session(&mut self, id: &SessionId) -> Result<&ChatSession, SessionError> {
        let index = self
            .position(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        self.active = index;
        Ok(&self.sessions[index])
    }

    pub fn active(&self) -> &ChatSession {
        &self.sessions[self.active]
    }

    pub fn active_id(&self) -> &SessionId {
        self.active().id()
    }

    pub(crate) fn active_mut(&mut self) -> &mut ChatSession {
        &mut self.sessions[self.active]
    }

    pub fn get(&self, id: &SessionId) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    /// Sessions in listing order (newest first).
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Append a message to a specific session, active or not.
    pub(crate) fn append(&mut self, id: &SessionId, message: Message) -> Result<(), SessionError> {
        let index = self
            .position(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        self.sessions[index].push(message);
        Ok(())
    }

    fn position(&self, id: &SessionId) -> Option<usize> {
        self.sessions.iter().position(|s| s.id() == id)
    }
}

impl Default for SessionDirectory {
    fn default() -> Self {
        Self::new()
    }
}
