//! Study modes selecting the instruction variant for a request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyMode {
    #[default]
    General,
    Explain,
    StepByStep,
    Quiz,
}

impl StudyMode {
    /// All modes in selector order.
    pub const ALL: [StudyMode; 4] = [
        StudyMode::General,
        StudyMode::Explain,
        StudyMode::StepByStep,
        StudyMode::Quiz,
    ];

    /// Short label shown in the mode selector.
    pub fn label(self) -> &'static str {
        match self {
            StudyMode::General => "General",
            StudyMode::Explain => "Explain",
            StudyMode::StepByStep => "Steps",
            StudyMode::Quiz => "Quiz",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown study mode '{0}' (expected general, explain, steps or quiz)")]
pub struct ParseModeError(String);

impl FromStr for StudyMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "general" => Ok(StudyMode::General),
            "explain" => Ok(StudyMode::Explain),
            "steps" | "step-by-step" => Ok(StudyMode::StepByStep),
            "quiz" => Ok(StudyMode::Quiz),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
