//! Conversation controller: one in-flight completion request at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use edubuddy_common::SessionId;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::mode::StudyMode;
use crate::prompt::{self, ERROR_REPLY};
use crate::{ChunkHandler, CompletionClient, Message};

use super::directory::SessionDirectory;
use super::types::{BusyGuard, ChatSession, IgnoreReason, SessionError, SubmitOutcome};

/// Owns the session directory and the busy flag, and talks to the model.
pub struct Conversation {
    client: Arc<dyn CompletionClient>,
    /// Sessions and the active-session pointer.
    directory: RwLock<SessionDirectory>,
    /// Whether a completion request is currently in flight.
    busy: AtomicBool,
}

impl Conversation {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_directory(client, SessionDirectory::new())
    }

    pub fn with_directory(client: Arc<dyn CompletionClient>, directory: SessionDirectory) -> Self {
        Self {
            client,
            directory: RwLock::new(directory),
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Read access to all sessions. Do not hold across a `submit`.
    pub async fn directory(&self) -> RwLockReadGuard<'_, SessionDirectory> {
        self.directory.read().await
    }

    pub async fn active_session(&self) -> ChatSession {
        self.directory.read().await.active().clone()
    }

    /// Create an empty session and make it active.
    pub async fn create_session(&self) -> ChatSession {
        self.directory.write().await.create_session().clone()
    }

    /// Switch the active session. Allowed while a request is in flight.
    pub async fn select_session(&self, id: &SessionId) -> Result<ChatSession, SessionError> {
        self.directory
            .write()
            .await
            .select_session(id)
            .cloned()
    }

    /// Submit user text to the active session and wait for the reply.
    pub async fn submit(&self, text: &str, mode: StudyMode) -> SubmitOutcome {
        self.run(text, mode, None).await
    }

    /// Like [`submit`](Self::submit), reporting reply text as it streams in.
    pub async fn submit_streaming(
        &self,
        text: &str,
        mode: StudyMode,
        on_chunk: ChunkHandler,
    ) -> SubmitOutcome {
        self.run(text, mode, Some(on_chunk)).await
    }

    async fn run(&self, text: &str, mode: StudyMode, on_chunk: Option<ChunkHandler>) -> SubmitOutcome {
        if text.trim().is_empty() {
            debug!("ignoring empty submission");
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let Some(_guard) = BusyGuard::try_acquire(&self.busy) else {
            debug!("ignoring submission while a request is in flight");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        // Record the user turn, then build the request from the updated history.
        // The adapter appends `text` again as the final turn.
        let (session_id, request) = {
            let mut directory = self.directory.write().await;
            let session = directory.active_mut();
            session.push(Message::user(text));
            let request = prompt::build_request_payload(session.messages(), text, mode);
            (session.id().clone(), request)
        };

        info!(session = %session_id, mode = %mode, "submitting to model");

        let result = match on_chunk {
            Some(on_chunk) => self.client.generate_streaming(&request, on_chunk).await,
            None => self.client.generate(&request).await,
        };

        let outcome = match result {
            Ok(text) => SubmitOutcome::Answered {
                session_id: session_id.clone(),
                reply: Message::assistant(prompt::reply_or_fallback(&text)),
            },
            Err(e) => {
                warn!(session = %session_id, error = %e, "completion request failed");
                SubmitOutcome::Failed {
                    session_id: session_id.clone(),
                    reply: Message::assistant(ERROR_REPLY),
                }
            }
        };

        if let Some(reply) = outcome.reply() {
            let mut directory = self.directory.write().await;
            if let Err(e) = directory.append(&session_id, reply.clone()) {
                warn!("dropping reply: {e}");
            }
        }

        outcome
    }
}
