//! Accord AI - chat and document generation service library
//!
//! This library bridges the Accord chat client to a local LLM inference
//! endpoint and, when a user asks for one, turns model output into a
//! downloadable spreadsheet or report.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `gateway`: the sole integration point with the model endpoint
//! - `intent`: keyword decision list plus model fallback classification
//! - `extract`: structured data extraction from free-text model replies
//! - `render`: spreadsheet and report rendering
//! - `publish`: export-directory publishing and the file-opener capability
//! - `pipeline`: per-request orchestration with plain-chat fallback
//! - `server`: the axum HTTP surface
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod intent;
pub mod pipeline;
pub mod prompts;
pub mod publish;
pub mod render;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{AccordError, Result};
pub use extract::{Record, TableData};
pub use gateway::{ModelGateway, OllamaGateway};
pub use intent::Intent;
pub use pipeline::{AskRequest, AskResponse, Pipeline};
