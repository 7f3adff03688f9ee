use std::path::PathBuf;

use clap::Parser;
use edubuddy_ai::StudyMode;

/// EduBuddy: a study assistant in your terminal.
#[derive(Parser, Debug)]
#[command(name = "edubuddy", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Study mode to start in (general, explain, steps, quiz).
    #[arg(short = 'm', long, default_value = "general")]
    pub mode: StudyMode,

    /// Wait for complete replies instead of streaming them.
    #[arg(long)]
    pub no_stream: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
