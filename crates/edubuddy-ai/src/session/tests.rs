//! Tests for the conversation controller.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::*;
use crate::prompt::{EMPTY_REPLY, ERROR_REPLY};
use crate::request::{CompletionRequest, RemoteRole};
use crate::{AiError, ChunkHandler, CompletionClient, Role, StudyMode};

/// Replies from a script and records every request it receives.
#[derive(Default)]
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn replying(replies: Vec<Result<String, AiError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, AiError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("default reply".into()))
    }
}

/// Holds each request until the test releases it.
#[derive(Default)]
struct GatedClient {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl CompletionClient for GatedClient {
    async fn generate(&self, _request: &CompletionRequest) -> Result<String, AiError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("released".into())
    }
}

/// Streams a fixed reply in pieces.
struct ChunkedClient {
    chunks: Vec<&'static str>,
}

#[async_trait]
impl CompletionClient for ChunkedClient {
    async fn generate(&self, _request: &CompletionRequest) -> Result<String, AiError> {
        Ok(self.chunks.concat())
    }

    async fn generate_streaming(
        &self,
        _request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<String, AiError> {
        for chunk in &self.chunks {
            on_chunk(chunk.to_string());
        }
        Ok(self.chunks.concat())
    }
}

/// Streams some text, then fails.
struct BrokenStreamClient {
    chunks: Vec<&'static str>,
}

#[async_trait]
impl CompletionClient for BrokenStreamClient {
    async fn generate(&self, _request: &CompletionRequest) -> Result<String, AiError> {
        Err(AiError::Timeout)
    }

    async fn generate_streaming(
        &self,
        _request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<String, AiError> {
        for chunk in &self.chunks {
            on_chunk(chunk.to_string());
        }
        Err(AiError::NetworkError("connection reset".into()))
    }
}

fn roles(session: &ChatSession) -> Vec<Role> {
    session.messages().iter().map(|m| m.role()).collect()
}

#[tokio::test]
async fn submit_appends_user_then_assistant() {
    let client = ScriptedClient::replying(vec![Ok("Chlorophyll captures light.".into())]);
    let conversation = Conversation::new(client.clone());

    let outcome = conversation
        .submit("What does chlorophyll do?", StudyMode::Explain)
        .await;

    assert!(matches!(outcome, SubmitOutcome::Answered { .. }));
    let session = conversation.active_session().await;
    assert_eq!(roles(&session), vec![Role::User, Role::Assistant]);
    assert_eq!(session.messages()[0].content(), "What does chlorophyll do?");
    assert_eq!(session.messages()[1].content(), "Chlorophyll captures light.");
    assert!(!conversation.is_busy());
}

#[tokio::test]
async fn empty_or_whitespace_input_is_ignored() {
    let client = ScriptedClient::replying(vec![]);
    let conversation = Conversation::new(client.clone());

    for text in ["", "   ", "\n\t"] {
        let outcome = conversation.submit(text, StudyMode::General).await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Ignored(IgnoreReason::EmptyInput)
        ));
    }

    assert!(conversation.active_session().await.is_empty());
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn remote_failure_appends_apology_and_clears_busy() {
    let client = ScriptedClient::replying(vec![Err(AiError::NetworkError("offline".into()))]);
    let conversation = Conversation::new(client.clone());

    let outcome = conversation.submit("Explain gravity", StudyMode::General).await;

    let reply = match outcome {
        SubmitOutcome::Failed { reply, .. } => reply,
        other => panic!("expected failure, got {other:?}"),
    };
    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(reply.content(), ERROR_REPLY);
    assert!(!reply.content().contains("offline"));

    let session = conversation.active_session().await;
    assert_eq!(roles(&session), vec![Role::User, Role::Assistant]);
    assert_eq!(session.messages()[1].content(), ERROR_REPLY);
    assert!(!conversation.is_busy());
}

#[tokio::test]
async fn failure_is_not_retried() {
    let client = ScriptedClient::replying(vec![Err(AiError::RateLimited)]);
    let conversation = Conversation::new(client.clone());

    conversation.submit("Hi", StudyMode::General).await;

    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn empty_model_reply_uses_fallback_text() {
    let client = ScriptedClient::replying(vec![Ok(String::new())]);
    let conversation = Conversation::new(client);

    let outcome = conversation.submit("Hi", StudyMode::General).await;

    assert_eq!(outcome.reply().unwrap().content(), EMPTY_REPLY);
}

#[tokio::test]
async fn first_message_names_the_session() {
    let client = ScriptedClient::replying(vec![]);
    let conversation = Conversation::new(client);

    conversation
        .submit(
            "What is photosynthesis and why does it matter to plants?",
            StudyMode::General,
        )
        .await;
    conversation.submit("Tell me more", StudyMode::General).await;

    assert_eq!(
        conversation.active_session().await.title(),
        "What is photosynthesis and why..."
    );
}

#[tokio::test]
async fn short_first_message_is_the_title() {
    let conversation = Conversation::new(ScriptedClient::replying(vec![]));
    conversation.submit("Hi", StudyMode::General).await;
    assert_eq!(conversation.active_session().await.title(), "Hi");
}

fn texts(request: &CompletionRequest) -> Vec<&str> {
    request
        .contents
        .iter()
        .map(|c| c.parts[0].text.as_str())
        .collect()
}

#[tokio::test]
async fn first_request_carries_recorded_turn_and_raw_text() {
    let client = ScriptedClient::replying(vec![Ok("A cell is...".into())]);
    let conversation = Conversation::new(client.clone());

    conversation.submit("What is a cell?", StudyMode::General).await;

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    // Updated history (with the new user turn) plus the raw text as the final turn.
    assert_eq!(requests[0].roles(), vec![RemoteRole::User, RemoteRole::User]);
    assert_eq!(texts(&requests[0]), ["What is a cell?", "What is a cell?"]);
}

#[tokio::test]
async fn request_carries_updated_history_then_new_text() {
    let client = ScriptedClient::replying(vec![Ok("A cell is...".into()), Ok("A tissue is...".into())]);
    let conversation = Conversation::new(client.clone());

    conversation.submit("What is a cell?", StudyMode::General).await;
    conversation.submit("And a tissue?", StudyMode::Quiz).await;

    let requests = client.requests();
    assert_eq!(requests.len(), 2);

    let second = &requests[1];
    assert_eq!(
        second.roles(),
        vec![
            RemoteRole::User,
            RemoteRole::Model,
            RemoteRole::User,
            RemoteRole::User
        ]
    );
    assert_eq!(
        texts(second),
        ["What is a cell?", "A cell is...", "And a tissue?", "And a tissue?"]
    );
    assert_eq!(
        second.system_instruction,
        crate::prompt::build_instruction(StudyMode::Quiz)
    );
}

#[tokio::test]
async fn submissions_while_busy_are_dropped() {
    let client = Arc::new(GatedClient::default());
    let conversation = Arc::new(Conversation::new(client.clone()));

    let in_flight = {
        let conversation = conversation.clone();
        tokio::spawn(async move { conversation.submit("first", StudyMode::General).await })
    };
    client.entered.notified().await;
    assert!(conversation.is_busy());

    for _ in 0..3 {
        let outcome = conversation.submit("second", StudyMode::General).await;
        assert!(matches!(outcome, SubmitOutcome::Ignored(IgnoreReason::Busy)));
    }
    assert_eq!(conversation.active_session().await.message_count(), 1);

    client.release.notify_one();
    let outcome = in_flight.await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Answered { .. }));

    let session = conversation.active_session().await;
    assert_eq!(roles(&session), vec![Role::User, Role::Assistant]);
    assert!(!conversation.is_busy());
}

#[tokio::test]
async fn reply_lands_in_originating_session_after_switch() {
    let client = Arc::new(GatedClient::default());
    let conversation = Arc::new(Conversation::new(client.clone()));
    let session_a = conversation.active_session().await.id().clone();

    let in_flight = {
        let conversation = conversation.clone();
        tokio::spawn(async move { conversation.submit("about atoms", StudyMode::General).await })
    };
    client.entered.notified().await;

    // Switching sessions is allowed while busy.
    let session_b = conversation.create_session().await.id().clone();

    client.release.notify_one();
    let outcome = in_flight.await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Answered { ref session_id, .. } if *session_id == session_a));

    assert!(conversation.active_session().await.is_empty());
    let a = conversation.select_session(&session_a).await.unwrap();
    assert_eq!(roles(&a), vec![Role::User, Role::Assistant]);
    let b = conversation.select_session(&session_b).await.unwrap();
    assert!(b.is_empty());
}

#[tokio::test]
async fn sessions_are_isolated() {
    let conversation = Conversation::new(ScriptedClient::replying(vec![]));
    let session_a = conversation.active_session().await.id().clone();
    conversation.submit("Question for A", StudyMode::General).await;

    let session_b = conversation.create_session().await.id().clone();
    assert!(conversation.active_session().await.is_empty());
    conversation.submit("Question for B", StudyMode::General).await;

    let b = conversation.active_session().await;
    assert!(b.messages().iter().all(|m| !m.content().contains("for A")));

    let a = conversation.select_session(&session_a).await.unwrap();
    assert_eq!(a.messages()[0].content(), "Question for A");
    assert_eq!(a.message_count(), 2);

    let directory = conversation.directory().await;
    assert_eq!(directory.len(), 2);
    assert_eq!(directory.get(&session_b).unwrap().title(), "Question for B");
}

#[tokio::test]
async fn select_unknown_session_fails() {
    let conversation = Conversation::new(ScriptedClient::replying(vec![]));
    let err = conversation
        .select_session(&edubuddy_common::SessionId::from("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotFound(_)));
}

#[tokio::test]
async fn streaming_submit_reports_chunks_and_records_full_reply() {
    let client = Arc::new(ChunkedClient {
        chunks: vec!["Step 1: ", "subtract 5. ", "Step 2: divide by 2."],
    });
    let conversation = Conversation::new(client);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    let outcome = conversation
        .submit_streaming(
            "Solve 2x+5=15",
            StudyMode::StepByStep,
            Box::new(move |chunk: String| sink.lock().unwrap().push(chunk)),
        )
        .await;

    assert_eq!(seen.lock().unwrap().len(), 3);
    assert_eq!(
        outcome.reply().unwrap().content(),
        "Step 1: subtract 5. Step 2: divide by 2."
    );
}

#[tokio::test]
async fn default_streaming_delivers_one_chunk() {
    let client = ScriptedClient::replying(vec![Ok("whole reply".into())]);
    let conversation = Conversation::new(client);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    conversation
        .submit_streaming(
            "Hi",
            StudyMode::General,
            Box::new(move |chunk: String| sink.lock().unwrap().push(chunk)),
        )
        .await;

    assert_eq!(*seen.lock().unwrap(), vec!["whole reply".to_string()]);
}

#[tokio::test]
async fn blank_streamed_reply_records_fallback() {
    let client = Arc::new(ChunkedClient {
        chunks: vec!["  ", "\n"],
    });
    let conversation = Conversation::new(client);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    let outcome = conversation
        .submit_streaming(
            "Hi",
            StudyMode::General,
            Box::new(move |chunk: String| sink.lock().unwrap().push(chunk)),
        )
        .await;

    // The recorded reply differs from what was streamed.
    assert_eq!(seen.lock().unwrap().concat(), "  \n");
    assert!(matches!(outcome, SubmitOutcome::Answered { .. }));
    assert_eq!(outcome.reply().unwrap().content(), EMPTY_REPLY);
    let session = conversation.active_session().await;
    assert_eq!(session.messages()[1].content(), EMPTY_REPLY);
}

#[tokio::test]
async fn failure_mid_stream_records_only_the_apology() {
    let client = Arc::new(BrokenStreamClient {
        chunks: vec!["Photosynthesis is ", "the process"],
    });
    let conversation = Conversation::new(client);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    let outcome = conversation
        .submit_streaming(
            "Explain photosynthesis",
            StudyMode::Explain,
            Box::new(move |chunk: String| sink.lock().unwrap().push(chunk)),
        )
        .await;

    assert_eq!(seen.lock().unwrap().len(), 2);
    let reply = match outcome {
        SubmitOutcome::Failed { reply, .. } => reply,
        other => panic!("expected failure, got {other:?}"),
    };
    assert_eq!(reply.content(), ERROR_REPLY);

    let session = conversation.active_session().await;
    assert_eq!(roles(&session), vec![Role::User, Role::Assistant]);
    assert_eq!(session.messages()[1].content(), ERROR_REPLY);
    assert!(session
        .messages()
        .iter()
        .all(|m| !m.content().contains("the process")));
    assert!(!conversation.is_busy());
}
