mod cli;
mod repl;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use edubuddy_ai::{Conversation, GeminiClient, GeminiConfig};
use edubuddy_common::{ConfigError, EduBuddyError};
use edubuddy_config::EduBuddyConfig;
use tracing_subscriber::EnvFilter;

/// Load environment variables from a `.env` file (KEY=VALUE lines).
///
/// Variables already present in the environment win.
fn load_dotenv() {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn init_logging(level: &str) {
    let directive = format!("edubuddy={level}");
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| "edubuddy=info".parse().unwrap()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &cli::Args) -> Result<EduBuddyConfig, ConfigError> {
    match args.config {
        Some(ref path) => edubuddy_config::load_config_from(path),
        None => edubuddy_config::load_config(),
    }
}

async fn run(
    args: cli::Args,
    loaded: Result<EduBuddyConfig, ConfigError>,
) -> edubuddy_common::Result<()> {
    // An explicit --config must load; the default location falls back to defaults.
    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_none() => {
            tracing::warn!("Config load failed, using defaults: {e}");
            EduBuddyConfig::default()
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!("Effective config: {}", edubuddy_config::config_to_json(&config));

    let api_key = edubuddy_config::api_key(&config)?;
    let gemini = GeminiConfig::new(api_key)
        .with_model(config.gemini.model.clone())
        .with_timeouts(
            Duration::from_secs(config.gemini.connect_timeout_secs.into()),
            Duration::from_secs(config.gemini.request_timeout_secs.into()),
        );
    tracing::info!(model = %gemini.model, "Gemini client configured");

    let client = GeminiClient::new(gemini).map_err(|e| EduBuddyError::Ai(e.to_string()))?;
    let conversation = Arc::new(Conversation::new(Arc::new(client)));

    let stream = config.gemini.stream && !args.no_stream;
    repl::Repl::new(conversation, args.mode, stream).run().await
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();

    // Config is read before logging starts so its level can seed the filter.
    let loaded = load_config(&args);

    // CLI level wins over the config file.
    let level = args.log_level.clone().unwrap_or_else(|| match loaded {
        Ok(ref config) => config.logging.level.as_directive().to_string(),
        Err(_) => "info".to_string(),
    });
    init_logging(&level);

    tracing::info!("EduBuddy v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }

    match run(args, loaded).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("edubuddy: {e}");
            ExitCode::FAILURE
        }
    }
}
