//! Starter prompts offered on an empty session.

use edubuddy_ai::StudyMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Starter {
    pub text: &'static str,
    pub mode: StudyMode,
}

pub const STARTERS: [Starter; 4] = [
    Starter {
        text: "Explain Photosynthesis simply",
        mode: StudyMode::Explain,
    },
    Starter {
        text: "Step-by-step: Solve for x in 2x+5=15",
        mode: StudyMode::StepByStep,
    },
    Starter {
        text: "Quiz me on basic Chemistry",
        mode: StudyMode::Quiz,
    },
    Starter {
        text: "Summarize Hamlet Act 1",
        mode: StudyMode::General,
    },
];

/// Look up a starter by its 1-based number as shown to the user.
pub fn starter(number: usize) -> Option<&'static Starter> {
    number.checked_sub(1).and_then(|i| STARTERS.get(i))
}
