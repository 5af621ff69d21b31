//! Request orchestration
//!
//! Composes the classifier, extractor, renderer, and publisher into one
//! pass per request. The document path returns an explicit `Result`; any
//! failure inside it abandons the whole path and the request falls through
//! to a single plain-chat call.

use crate::config::Config;
use crate::extract;
use crate::gateway::ModelGateway;
use crate::intent::{self, Intent};
use crate::prompts;
use crate::publish::{FileOpener, FilePublisher, NoopOpener, SystemOpener};
use crate::render::{DocumentFormat, DocumentRenderer};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inbound request body for `/ask`
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    /// Prior conversation transcript, turns concatenated into one block
    #[serde(default)]
    pub history: String,

    /// The user's question
    pub question: String,

    /// Switches to the deep-analysis prompt variant
    #[serde(default)]
    pub analysis_mode: bool,
}

/// Outbound response body for `/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// The chat answer or the document-ready message
    pub answer: String,

    /// Download URL of the generated document, when one was produced
    pub attachment: Option<String>,
}

/// The per-request pipeline shared across the HTTP server
pub struct Pipeline {
    gateway: Arc<dyn ModelGateway>,
    renderer: DocumentRenderer,
    publisher: FilePublisher,
    opener: Arc<dyn FileOpener>,
}

impl Pipeline {
    /// Build a pipeline from configuration and a gateway
    pub fn new(config: &Config, gateway: Arc<dyn ModelGateway>) -> Self {
        let opener: Arc<dyn FileOpener> = if config.server.open_generated_files {
            Arc::new(SystemOpener)
        } else {
            Arc::new(NoopOpener)
        };

        Self {
            gateway,
            renderer: DocumentRenderer::new(config.server.workdir.clone()),
            publisher: FilePublisher::new(
                config.server.base_url.clone(),
                config.server.export_dir.clone(),
            ),
            opener,
        }
    }

    /// Build a pipeline from explicit parts (used by tests)
    pub fn with_parts(
        gateway: Arc<dyn ModelGateway>,
        renderer: DocumentRenderer,
        publisher: FilePublisher,
        opener: Arc<dyn FileOpener>,
    ) -> Self {
        Self {
            gateway,
            renderer,
            publisher,
            opener,
        }
    }

    /// Handle one request end to end
    ///
    /// Classifies the question, attempts the document path when an intent
    /// matched, and otherwise (or on any document-path failure) answers
    /// with a single plain-chat call. Only a failure of that final chat
    /// call propagates to the caller.
    pub async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        if !request.analysis_mode {
            let intent = intent::classify(self.gateway.as_ref(), &request.question).await;
            if let Some(format) = document_format(intent) {
                match self
                    .document_path(&request.history, &request.question, intent, format)
                    .await
                {
                    Ok(url) => {
                        return Ok(AskResponse {
                            answer: format!(
                                "I've prepared the document you asked for. You can download it here: {}",
                                url
                            ),
                            attachment: Some(url),
                        });
                    }
                    Err(err) => {
                        tracing::warn!(
                            "Document path failed, falling back to plain chat: {:#}",
                            err
                        );
                    }
                }
            }
        }

        let prompt = if request.analysis_mode {
            prompts::analysis_prompt(&request.history)
        } else {
            prompts::chat_prompt(&request.history, &request.question)
        };

        let answer = self.gateway.generate(&prompt).await?;
        Ok(AskResponse {
            answer,
            attachment: None,
        })
    }

    /// Extract, render, and publish a document, returning its URL
    async fn document_path(
        &self,
        history: &str,
        question: &str,
        intent: Intent,
        format: DocumentFormat,
    ) -> Result<String> {
        let data = extract::extract(self.gateway.as_ref(), history, question, intent).await?;
        let path = self.renderer.render(format, &data, question)?;
        let url = self.publisher.publish(&path)?;

        if let Some(filename) = path.file_name().and_then(|name| name.to_str()) {
            self.opener.open(&self.publisher.export_path(filename));
        }

        Ok(url)
    }
}

/// Map an intent onto its document format; `None` means plain chat
fn document_format(intent: Intent) -> Option<DocumentFormat> {
    match intent {
        Intent::Spreadsheet => Some(DocumentFormat::Spreadsheet),
        Intent::Report => Some(DocumentFormat::Report),
        Intent::None => None,
    }
}
