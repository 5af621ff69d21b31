//! Command-line interface definition for the Accord AI service
//!
//! This module defines the CLI structure using clap's derive API. The
//! service is a single long-running server, so there are no subcommands,
//! only configuration overrides.

use clap::Parser;

/// Accord AI - chat and document generation service
///
/// Bridges the Accord chat client to a local Ollama endpoint and renders
/// structured documents (spreadsheets, reports) on request.
#[derive(Parser, Debug, Clone)]
#[command(name = "accord-ai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the listen address from config (e.g. 0.0.0.0:5002)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Override the Ollama model from config
    #[arg(short, long)]
    pub model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
