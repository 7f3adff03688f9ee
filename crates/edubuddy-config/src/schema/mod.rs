//! Configuration schema types for EduBuddy.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod gemini;
mod system;

pub use gemini::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for EduBuddy.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EduBuddyConfig {
    pub gemini: GeminiSection,
    pub logging: LoggingConfig,
}
