//! HTTP server for the Accord AI service
//!
//! Exposes `POST /ask` and serves generated documents as static content
//! under `/static`. Each request is self-contained; the only shared state
//! is the pipeline behind an `Arc`.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{AskRequest, AskResponse, Pipeline};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Error body returned on a failed request
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Human-readable failure description
    pub detail: String,
}

/// Build the application router
pub fn router(pipeline: Arc<Pipeline>, static_dir: &str) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(pipeline)
}

/// Handle a chat or document request
///
/// Errors escaping the pipeline (only plain-chat failures do) surface as
/// 500 with a textual detail field.
async fn ask(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<AskRequest>,
) -> std::result::Result<Json<AskResponse>, (StatusCode, Json<ErrorDetail>)> {
    tracing::debug!(
        "Handling /ask: question_len={}, analysis_mode={}",
        request.question.len(),
        request.analysis_mode
    );

    match pipeline.ask(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            tracing::error!("Request failed: {:#}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetail {
                    detail: format!("{:#}", err),
                }),
            ))
        }
    }
}

/// Bind and serve until shutdown
pub async fn serve(config: &Config, pipeline: Arc<Pipeline>) -> Result<()> {
    let app = router(pipeline, &config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    tracing::info!("Listening on {}", config.server.listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
