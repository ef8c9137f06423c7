//! Download of generated documents.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

use relnotes_core::StoreError;

use super::query::QueryErrorResponse;
use crate::state::AppState;

/// Serve a stored document by name.
pub async fn get_pdf(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match state.store().get(&name).await {
        Ok(Some(bytes)) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", name),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "PDF not found".to_string()),
        Err(e @ StoreError::InvalidName(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            warn!(pdf = %name, error = %e, "Failed to read document");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(QueryErrorResponse { error })).into_response()
}
