//! Prompt construction.
//!
//! Turns a study mode into a system instruction and a session history into
//! the remote request shape. Pure transformation, no I/O.

use crate::mode::StudyMode;
use crate::request::{CompletionRequest, Content, RemoteRole, SamplingParams};
use crate::{Message, Role};

/// Sampling parameters sent with every request.
pub const SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.7,
    top_p: 0.95,
    top_k: 40,
};

/// Reply text used when the model returns nothing.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response.";

/// Reply text appended when the remote call fails.
pub const ERROR_REPLY: &str = "I'm sorry, I encountered an error while processing your request. \
     Please check your connection and try again.";

/// The sentence in the base rules that offers a follow-up quiz.
pub const QUIZ_OFFER: &str = "ask the student if they would like to take a short quiz";

const BASE_INSTRUCTION: &str = "You are EduBuddy, a highly intelligent and supportive student assistant.
Your primary goal is to make learning accessible and engaging.

CORE RULES:
1. ALWAYS use simple, clear language. Avoid academic jargon. If you must use a complex term, define it immediately using a simple analogy.
2. ALWAYS provide at least one real-world example to illustrate the concept.
3. AT THE END of every explanation or step-by-step solution, ask the student if they would like to take a short quiz to test their understanding.
4. Format responses with clean Markdown: use bold for key terms, lists for steps, and code blocks for formulas.
5. Maintain an encouraging and patient tone.";

const GENERAL_GUIDANCE: &str =
    "Provide summaries, definitions, or study tips. Keep your answers concise but illustrative.";

const EXPLAIN_GUIDANCE: &str = "Focus on deep conceptual understanding. Use metaphors and analogies \
     to bridge the gap between complex ideas and everyday life.";

const STEP_BY_STEP_GUIDANCE: &str = "Break down problems into small, manageable numbered steps. \
     For every step, explain the 'why' in simple terms before showing the 'how'.";

const QUIZ_INSTRUCTION: &str = "You are an encouraging examiner. Generate 3-5 fun and relevant \
     multiple-choice or short-answer questions. After the user answers, give immediate, supportive \
     feedback and explain the correct answer simply. Do not ask if they want a quiz since you are \
     already in quiz mode.";

/// Build the system instruction for a study mode.
pub fn build_instruction(mode: StudyMode) -> String {
    let guidance = match mode {
        StudyMode::Quiz => return QUIZ_INSTRUCTION.to_string(),
        StudyMode::General => GENERAL_GUIDANCE,
        StudyMode::Explain => EXPLAIN_GUIDANCE,
        StudyMode::StepByStep => STEP_BY_STEP_GUIDANCE,
    };
    format!("{BASE_INSTRUCTION} {guidance}")
}

/// Build the remote request from recorded history and the new user text.
///
/// System messages are dropped, assistant turns become `model` turns and
/// `current_text` is appended as the final user turn.
pub fn build_request_payload(
    history: &[Message],
    current_text: &str,
    mode: StudyMode,
) -> CompletionRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .filter_map(|msg| {
            let role = match msg.role() {
                Role::User => RemoteRole::User,
                Role::Assistant => RemoteRole::Model,
                Role::System => return None,
            };
            Some(Content::text(role, msg.content()))
        })
        .collect();

    contents.push(Content::text(RemoteRole::User, current_text));

    CompletionRequest {
        contents,
        system_instruction: build_instruction(mode),
        sampling: SAMPLING,
    }
}

/// Substitute the fixed fallback for an empty model reply.
pub fn reply_or_fallback(text: &str) -> String {
    if text.trim().is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        text.to_string()
    }
}
