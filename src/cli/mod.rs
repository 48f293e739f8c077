//! CLI module for Alphonse
//!
//! - `serve`: HTTP API
//! - `ask`: answer a single question and print the result

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

/// Alphonse - sarcastic question answering over live web snippets
#[derive(Parser)]
#[command(name = "alphonse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Answer one question and print the JSON response
    Ask(ask::AskArgs),
}
