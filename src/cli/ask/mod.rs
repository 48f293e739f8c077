//! Ask command - answers one question from the terminal

use anyhow::Context;
use clap::Args;

use crate::config::{AppConfig, LogFormat};
use crate::infrastructure::logging;

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Question to answer; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    words: Vec<String>,
}

impl AskArgs {
    pub fn question(&self) -> String {
        self.words.join(" ")
    }
}

/// Answer the question and print the response as pretty JSON on stdout
///
/// Logs go to stderr so the output stays machine-readable.
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    config.logging.format = LogFormat::Compact;
    logging::init_logging(&config.logging);

    let orchestrator = crate::create_orchestrator(&config)?;
    let response = orchestrator.answer(&args.question()).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
