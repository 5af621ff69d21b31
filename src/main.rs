//! Accord AI - chat and document generation service
//!
//! Main entry point: initializes tracing, loads configuration, and starts
//! the HTTP server.

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use accord_ai::cli::Cli;
use accord_ai::config::Config;
use accord_ai::gateway::OllamaGateway;
use accord_ai::pipeline::Pipeline;
use accord_ai::server;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    tracing::info!(
        "Starting accord-ai: ollama={} model={}",
        config.ollama.host,
        config.ollama.model
    );

    let gateway = Arc::new(OllamaGateway::new(config.ollama.clone())?);
    let pipeline = Arc::new(Pipeline::new(&config, gateway));

    server::serve(&config, pipeline).await
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence; `--verbose` lowers the default level to
/// debug for this crate.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "accord_ai=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
