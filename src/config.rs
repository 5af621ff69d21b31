//! Configuration management for the Accord AI service
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file with CLI overrides.

use crate::cli::Cli;
use crate::error::{AccordError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Main configuration structure for the service
///
/// Holds the HTTP server settings, the document export settings, and the
/// Ollama endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server and publishing configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Ollama endpoint configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// HTTP server and file publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Base address used to build download URLs for generated documents
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory served as static content under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Directory generated documents are moved into; also appears in the
    /// download URL, so it should live under `static_dir`
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Scratch directory documents are rendered into before publishing
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Attempt to open generated documents with the host's file opener
    #[serde(default)]
    pub open_generated_files: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:5002".to_string()
}

fn default_base_url() -> String {
    "http://localhost:5002".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_export_dir() -> String {
    "static/generated_docs".to_string()
}

fn default_workdir() -> String {
    std::env::temp_dir().to_string_lossy().into_owned()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            base_url: default_base_url(),
            static_dir: default_static_dir(),
            export_dir: default_export_dir(),
            workdir: default_workdir(),
            open_generated_files: false,
        }
    }
}

/// Ollama endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for generation
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3:instruct".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, applying CLI overrides
    ///
    /// A missing file is not an error; defaults are used so the service can
    /// run against a local Ollama with no configuration at all.
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path).map_err(AccordError::Io)?;
            serde_yaml::from_str(&contents).map_err(AccordError::Yaml)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default()
        };

        if let Some(listen) = &cli.listen {
            config.server.listen_addr = listen.clone();
        }
        if let Some(model) = &cli.model {
            config.ollama.model = model.clone();
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the listen address does not parse, or
    /// when a required field is empty.
    pub fn validate(&self) -> Result<()> {
        self.server
            .listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| {
                AccordError::Config(format!(
                    "invalid listen address '{}': {}",
                    self.server.listen_addr, e
                ))
            })?;

        if self.server.base_url.is_empty() {
            return Err(AccordError::Config("base_url must not be empty".to_string()).into());
        }
        if self.server.export_dir.is_empty() {
            return Err(AccordError::Config("export_dir must not be empty".to_string()).into());
        }
        if self.ollama.host.is_empty() {
            return Err(AccordError::Config("ollama.host must not be empty".to_string()).into());
        }
        if self.ollama.model.is_empty() {
            return Err(AccordError::Config("ollama.model must not be empty".to_string()).into());
        }

        Ok(())
    }
}
