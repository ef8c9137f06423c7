//! Chat-style release notes endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use relnotes_core::{PipelineOutcome, Stage};

use crate::state::AppState;

/// Request body for a release notes query
#[derive(Debug, Deserialize)]
pub struct QueryBody {
    /// Free-text request, e.g. "release notes for ZOOKEEPER 3.9.0"
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub message: String,
    /// Download link, present only when a document was generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct QueryErrorResponse {
    pub error: String,
}

/// Download path for a generated document.
pub fn pdf_url(pdf_name: &str) -> String {
    format!("/api/v1/pdf/{}", pdf_name)
}

/// Run the pipeline for one chat message.
///
/// Clarifications and stage failures are ordinary replies. Only requests the
/// guardrail rejects, or cannot screen, are HTTP errors.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryBody>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<QueryErrorResponse>)> {
    if body.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(QueryErrorResponse {
                error: "message must not be empty".to_string(),
            }),
        ));
    }

    let outcome = state.pipeline().run(&body.message).await;
    info!(outcome = outcome.label(), "Query handled");

    match &outcome {
        PipelineOutcome::PolicyViolation => Err((
            StatusCode::BAD_REQUEST,
            Json(QueryErrorResponse {
                error: outcome.reply(),
            }),
        )),
        PipelineOutcome::Failed {
            stage: Stage::Guardrail,
            ..
        } => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(QueryErrorResponse {
                error: outcome.reply(),
            }),
        )),
        _ => Ok(Json(QueryResponse {
            message: outcome.reply(),
            pdf_url: outcome.pdf_name().map(pdf_url),
        })),
    }
}
