//! Error types for the Accord AI service
//!
//! This module defines all error types used throughout the service,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Accord AI operations
///
/// This enum encompasses all possible errors that can occur while
/// talking to the model endpoint, extracting structured data, and
/// rendering documents.
#[derive(Error, Debug)]
pub enum AccordError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model endpoint could not be reached or returned a non-success status
    #[error("Could not connect to the local AI model: {0}")]
    UpstreamUnavailable(String),

    /// The model endpoint replied with a body that could not be parsed
    #[error("Received an invalid response from the AI model: {0}")]
    MalformedUpstreamResponse(String),

    /// Neither the JSON span nor the markdown fallback yielded any records
    #[error("No structured data could be extracted from the model reply")]
    NoStructuredDataExtracted,

    /// Document rendering errors (spreadsheet or report writer)
    #[error("Document render failed: {0}")]
    Render(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Accord AI operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
