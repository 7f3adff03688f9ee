//! Line-oriented terminal front-end.
//!
//! Reads commands and questions from stdin. Submissions run on a spawned
//! task that reports back over a channel, so the prompt stays usable while
//! a request is in flight.

mod commands;
mod render;
mod starters;

use std::io::Write;
use std::sync::Arc;

use edubuddy_ai::{Conversation, IgnoreReason, Message, StudyMode, SubmitOutcome};
use edubuddy_common::SessionId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use commands::Command;

/// Events sent from the submission task to the REPL loop.
#[derive(Debug)]
enum ReplyEvent {
    /// A streaming text chunk arrived.
    Chunk(String),
    /// The submission finished.
    Done(SubmitOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    conversation: Arc<Conversation>,
    mode: StudyMode,
    stream: bool,
    /// A submission task is running.
    in_flight: bool,
    /// Text of the in-flight reply printed so far, once streaming starts.
    streamed: Option<String>,
}

impl Repl {
    pub fn new(conversation: Arc<Conversation>, mode: StudyMode, stream: bool) -> Self {
        Self {
            conversation,
            mode,
            stream,
            in_flight: false,
            streamed: None,
        }
    }

    pub async fn run(mut self) -> edubuddy_common::Result<()> {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        print!("{}", render::banner(self.mode));
        print!("{}", render::starters());
        self.show_prompt()?;

        loop {
            // After stdin closes, wait for the in-flight reply before exiting.
            if !stdin_open && !self.in_flight {
                break;
            }

            tokio::select! {
                line = lines.next_line(), if stdin_open => match line? {
                    Some(line) => {
                        if self.handle_line(&line, &event_tx).await? == Flow::Quit {
                            break;
                        }
                    }
                    None => stdin_open = false,
                },
                Some(event) = event_rx.recv() => self.handle_event(event).await?,
            }
        }

        tracing::info!("Leaving chat");
        Ok(())
    }

    async fn handle_line(
        &mut self,
        line: &str,
        events: &mpsc::UnboundedSender<ReplyEvent>,
    ) -> edubuddy_common::Result<Flow> {
        match Command::parse(line) {
            Command::Empty => {}
            Command::Submit(text) => self.submit(text, events),
            Command::Mode(None) => print!("{}", render::modes(self.mode)),
            Command::Mode(Some(mode)) => {
                self.mode = mode;
                println!("Mode set to {mode}.");
            }
            Command::New => {
                let session = self.conversation.create_session().await;
                self.mode = StudyMode::General;
                println!("Started \"{}\". Mode reset to {}.", session.title(), self.mode);
                print!("{}", render::starters());
            }
            Command::Sessions => {
                let directory = self.conversation.directory().await;
                print!("{}", render::sessions(&directory));
            }
            Command::Switch(target) => self.switch(&target).await,
            Command::History => {
                let session = self.conversation.active_session().await;
                print!("{}", render::history(&session));
            }
            Command::Starters => print!("{}", render::starters()),
            Command::Starter(n) => match starters::starter(n) {
                Some(starter) => {
                    self.mode = starter.mode;
                    println!("Mode set to {}.", starter.mode);
                    self.submit(starter.text.to_string(), events);
                }
                None => println!("No starter {n}. Try /starters."),
            },
            Command::Help => print!("{}", render::help()),
            Command::Quit => return Ok(Flow::Quit),
            Command::Invalid(message) => println!("{message}"),
        }
        if !self.in_flight {
            self.show_prompt()?;
        }
        Ok(Flow::Continue)
    }

    async fn switch(&mut self, target: &str) {
        let id = match target.parse::<usize>() {
            Ok(n) => {
                let directory = self.conversation.directory().await;
                match n.checked_sub(1).and_then(|i| directory.sessions().get(i)) {
                    Some(session) => session.id().clone(),
                    None => {
                        println!("No session {n}. Try /sessions.");
                        return;
                    }
                }
            }
            Err(_) => SessionId::from(target),
        };

        match self.conversation.select_session(&id).await {
            Ok(session) => {
                println!("Switched to \"{}\".", session.title());
                print!("{}", render::history(&session));
            }
            Err(e) => println!("{e}"),
        }
    }

    fn submit(&mut self, text: String, events: &mpsc::UnboundedSender<ReplyEvent>) {
        if self.in_flight || self.conversation.is_busy() {
            println!("EduBuddy is still answering. Your message was not sent.");
            return;
        }

        self.in_flight = true;
        self.streamed = None;
        println!("{}", render::THINKING);

        let conversation = self.conversation.clone();
        let mode = self.mode;
        let stream = self.stream;
        let tx = events.clone();
        tokio::spawn(async move {
            let outcome = if stream {
                let chunk_tx = tx.clone();
                let on_chunk = Box::new(move |chunk: String| {
                    let _ = chunk_tx.send(ReplyEvent::Chunk(chunk));
                });
                conversation.submit_streaming(&text, mode, on_chunk).await
            } else {
                conversation.submit(&text, mode).await
            };
            let _ = tx.send(ReplyEvent::Done(outcome));
        });
    }

    async fn handle_event(&mut self, event: ReplyEvent) -> edubuddy_common::Result<()> {
        match event {
            ReplyEvent::Chunk(chunk) => {
                let mut out = std::io::stdout();
                if self.streamed.is_none() {
                    write!(out, "EduBuddy: ")?;
                }
                self.streamed.get_or_insert_with(String::new).push_str(&chunk);
                write!(out, "{chunk}")?;
                out.flush()?;
            }
            ReplyEvent::Done(outcome) => {
                self.in_flight = false;
                let streamed = self.streamed.take();
                if streamed.is_some() {
                    println!();
                }
                self.show_outcome(outcome, streamed.as_deref()).await;
                self.show_prompt()?;
            }
        }
        Ok(())
    }

    async fn show_outcome(&self, outcome: SubmitOutcome, streamed: Option<&str>) {
        match outcome {
            SubmitOutcome::Ignored(IgnoreReason::Busy) => {
                println!("EduBuddy is still answering. Your message was not sent.");
            }
            SubmitOutcome::Ignored(IgnoreReason::EmptyInput) => {}
            SubmitOutcome::Answered { session_id, reply } => {
                if !shown_by_stream(streamed, &reply) {
                    print!("{}", render::message(&reply));
                }
                self.note_other_session(&session_id).await;
            }
            SubmitOutcome::Failed { session_id, reply } => {
                print!("{}", render::message(&reply));
                self.note_other_session(&session_id).await;
            }
        }
    }

    async fn note_other_session(&self, session_id: &SessionId) {
        let directory = self.conversation.directory().await;
        if directory.active_id() != session_id {
            if let Some(session) = directory.get(session_id) {
                println!("(reply saved to \"{}\")", session.title());
            }
        }
    }

    fn show_prompt(&self) -> std::io::Result<()> {
        let mut out = std::io::stdout();
        write!(out, "{}", render::prompt(self.mode))?;
        out.flush()
    }
}

/// Whether streaming already put exactly the recorded reply on screen.
///
/// The recorded reply can differ from the streamed text, e.g. when a
/// blank reply was replaced by the fallback text.
fn shown_by_stream(streamed: Option<&str>, reply: &Message) -> bool {
    streamed == Some(reply.content())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streamed_reply_is_not_printed_twice() {
        let reply = Message::assistant("Plants make food.");
        assert!(shown_by_stream(Some("Plants make food."), &reply));
    }

    #[test]
    fn unstreamed_reply_is_printed() {
        let reply = Message::assistant("Plants make food.");
        assert!(!shown_by_stream(None, &reply));
    }

    #[test]
    fn fallback_after_blank_stream_is_printed() {
        let reply = Message::assistant(edubuddy_ai::prompt::EMPTY_REPLY);
        assert!(!shown_by_stream(Some("  \n"), &reply));
    }
}
