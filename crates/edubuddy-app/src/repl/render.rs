//! Text rendering for the terminal front-end.

use std::fmt::Write as _;

use edubuddy_ai::{ChatSession, Message, Role, SessionDirectory, StudyMode};

use super::starters::STARTERS;

pub const THINKING: &str = "EduBuddy is thinking...";

pub const DISCLAIMER: &str =
    "EduBuddy can make mistakes. Verify important information for your exams.";

pub fn banner(mode: StudyMode) -> String {
    format!(
        "EduBuddy v{}\nYour AI study assistant. Mode: {mode}. Type /help for commands.\n{DISCLAIMER}\n",
        env!("CARGO_PKG_VERSION")
    )
}

pub fn help() -> String {
    let mut out = String::from("Commands:\n");
    for (usage, what) in [
        ("/mode [m]", "show or set the study mode (general, explain, steps, quiz)"),
        ("/new", "start a new study session"),
        ("/sessions", "list sessions"),
        ("/switch <n|id>", "switch to a session"),
        ("/history", "show the current session"),
        ("/starters", "list starter prompts"),
        ("/starter <n>", "send a starter prompt"),
        ("/help", "show this help"),
        ("/quit", "exit"),
    ] {
        let _ = writeln!(out, "  {usage:<16} {what}");
    }
    out.push_str("Anything else is sent to EduBuddy.\n");
    out
}

pub fn prompt(mode: StudyMode) -> String {
    format!("[{mode}] > ")
}

pub fn modes(current: StudyMode) -> String {
    let labels: Vec<String> = StudyMode::ALL
        .iter()
        .map(|&m| {
            if m == current {
                format!("*{m}*")
            } else {
                m.to_string()
            }
        })
        .collect();
    format!("Mode: {}\n", labels.join("  "))
}

pub fn starters() -> String {
    let mut out = String::from("Try one of these (/starter <n>):\n");
    for (i, starter) in STARTERS.iter().enumerate() {
        let _ = writeln!(out, "  {}. [{}] {}", i + 1, starter.mode, starter.text);
    }
    out
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "EduBuddy",
        Role::System => "System",
    }
}

pub fn message(message: &Message) -> String {
    format!(
        "{} ({}): {}\n",
        speaker(message.role()),
        message.timestamp().format("%H:%M"),
        message.content()
    )
}

pub fn history(session: &ChatSession) -> String {
    let mut out = format!("== {} ==\n", session.title());
    if session.is_empty() {
        out.push_str("(no messages yet)\n");
        out.push_str(&starters());
    }
    for m in session.messages() {
        out.push_str(&message(m));
    }
    out
}

pub fn sessions(directory: &SessionDirectory) -> String {
    let active = directory.active_id();
    let mut out = String::new();
    for (i, session) in directory.sessions().iter().enumerate() {
        let marker = if session.id() == active { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {}. {} ({} messages, updated {})",
            i + 1,
            session.title(),
            session.message_count(),
            session.last_updated().format("%Y-%m-%d %H:%M"),
        );
    }
    out
}
