//! Model gateway for the Accord AI service
//!
//! This module implements the sole integration point with the local
//! inference endpoint. It sends a single non-streaming prompt to an
//! Ollama-compatible `/api/generate` endpoint and returns the text of
//! the last newline-delimited JSON object in the reply.

use crate::config::OllamaConfig;
use crate::error::{AccordError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Abstraction over the model endpoint
///
/// Every component that needs model output goes through this trait, which
/// keeps the classifier, extractor, and orchestrator testable without a
/// running inference server.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send a prompt and return the raw text reply
    ///
    /// Calls are blocking from the request's point of view: there is no
    /// retry and no caller-specified timeout, so a slow endpoint stalls
    /// the whole request.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Gateway to a local Ollama server
///
/// Posts `{model, prompt, stream: false}` to `{host}/api/generate` and
/// parses the body as newline-delimited JSON objects, returning the
/// `response` field of the last one.
pub struct OllamaGateway {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama's /api/generate endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// One line of an Ollama generate reply
#[derive(Debug, Deserialize)]
struct GenerateLine {
    #[serde(default)]
    response: String,
}

impl OllamaGateway {
    /// Create a new gateway instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OllamaConfig) -> Result<Self> {
        // Transport defaults only: the endpoint is expected to be slow and
        // the service has no cancellation path, so no client timeout is set.
        let client = Client::builder()
            .user_agent("accord-ai/0.2.0")
            .build()
            .map_err(|e| {
                AccordError::UpstreamUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized Ollama gateway: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

/// Parse an Ollama generate body as newline-delimited JSON objects and
/// return the `response` field of the last one
fn parse_generate_body(body: &str) -> Result<String> {
    let mut last: Option<GenerateLine> = None;
    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed: GenerateLine = serde_json::from_str(trimmed).map_err(|e| {
            AccordError::MalformedUpstreamResponse(format!("invalid JSON line: {}", e))
        })?;
        last = Some(parsed);
    }

    match last {
        Some(line) => Ok(line.response),
        None => Err(AccordError::MalformedUpstreamResponse(
            "reply contained no JSON objects".to_string(),
        )
        .into()),
    }
}

#[async_trait]
impl ModelGateway for OllamaGateway {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.host);

        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        tracing::debug!(
            "Sending generate request: model={}, prompt_len={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                AccordError::UpstreamUnavailable(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(AccordError::UpstreamUnavailable(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Ollama response body: {}", e);
            AccordError::MalformedUpstreamResponse(format!("Failed to read body: {}", e))
        })?;

        let reply = parse_generate_body(&body)?;
        tracing::debug!("Ollama reply: {} chars", reply.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_creation() {
        let config = OllamaConfig {
            host: "http://localhost:11434".to_string(),
            model: "llama3:instruct".to_string(),
        };
        let gateway = OllamaGateway::new(config);
        assert!(gateway.is_ok());
    }

    #[test]
    fn test_gateway_accessors() {
        let config = OllamaConfig {
            host: "http://localhost:11434".to_string(),
            model: "llama3:instruct".to_string(),
        };
        let gateway = OllamaGateway::new(config).unwrap();
        assert_eq!(gateway.host(), "http://localhost:11434");
        assert_eq!(gateway.model(), "llama3:instruct");
    }

    #[test]
    fn test_parse_single_object() {
        let body = r#"{"response": "Hello!"}"#;
        assert_eq!(parse_generate_body(body).unwrap(), "Hello!");
    }

    #[test]
    fn test_parse_uses_last_line() {
        let body = "{\"response\": \"partial\"}\n{\"response\": \"final answer\"}";
        assert_eq!(parse_generate_body(body).unwrap(), "final answer");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let body = "\n{\"response\": \"ok\"}\n\n";
        assert_eq!(parse_generate_body(body).unwrap(), "ok");
    }

    #[test]
    fn test_parse_missing_response_field_defaults_empty() {
        let body = r#"{"done": true}"#;
        assert_eq!(parse_generate_body(body).unwrap(), "");
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        let err = parse_generate_body("not json at all").unwrap_err();
        let accord = err.downcast_ref::<AccordError>().unwrap();
        assert!(matches!(accord, AccordError::MalformedUpstreamResponse(_)));
    }

    #[test]
    fn test_parse_empty_body_is_malformed() {
        let err = parse_generate_body("").unwrap_err();
        let accord = err.downcast_ref::<AccordError>().unwrap();
        assert!(matches!(accord, AccordError::MalformedUpstreamResponse(_)));
    }
}
