//! Parsing of REPL input lines.

use edubuddy_ai::StudyMode;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line.
    Empty,
    /// Text to send to the assistant.
    Submit(String),
    /// `/mode` shows the current mode; `/mode <m>` switches.
    Mode(Option<StudyMode>),
    New,
    Sessions,
    /// `/switch <n|id>`: a listing number or a session id.
    Switch(String),
    History,
    Starters,
    Starter(usize),
    Help,
    Quit,
    /// A command that could not be parsed, with a message for the user.
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Submit(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match (name.to_ascii_lowercase().as_str(), arg) {
            ("mode", "") => Command::Mode(None),
            ("mode", arg) => match arg.parse() {
                Ok(mode) => Command::Mode(Some(mode)),
                Err(e) => Command::Invalid(format!("{e}")),
            },
            ("new", _) => Command::New,
            ("sessions" | "ls", _) => Command::Sessions,
            ("switch", "") => Command::Invalid("usage: /switch <number|id>".into()),
            ("switch", arg) => Command::Switch(arg.to_string()),
            ("history", _) => Command::History,
            ("starters", _) => Command::Starters,
            ("starter", arg) => match arg.parse() {
                Ok(n) => Command::Starter(n),
                Err(_) => Command::Invalid("usage: /starter <1-4>".into()),
            },
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit" | "q", _) => Command::Quit,
            (other, _) => Command::Invalid(format!("unknown command '/{other}' (try /help)")),
        }
    }
}
