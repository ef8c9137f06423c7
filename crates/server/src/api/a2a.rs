//! Agent-to-agent task endpoint.
//!
//! Other agents hand over a free-text task and get a machine-readable
//! result envelope back. The HTTP status is always 200; success or failure
//! is carried in `status`.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use relnotes_core::PipelineResponse;

use crate::state::AppState;

/// Identifier this service answers with.
pub const AGENT_ID: &str = "release-notes-agent";

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    /// Caller-chosen task id; generated when absent.
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Success,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    pub agent_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PipelineResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn handle_task(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> Json<TaskResponse> {
    let task_id = request
        .task_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let outcome = state.pipeline().run(&request.message).await;
    info!(task_id = %task_id, outcome = outcome.label(), "A2A task handled");

    let response = if outcome.is_generated() {
        TaskResponse {
            task_id,
            status: TaskStatus::Success,
            agent_id: AGENT_ID,
            data: Some(outcome.to_response()),
            error: None,
        }
    } else {
        TaskResponse {
            task_id,
            status: TaskStatus::Failed,
            agent_id: AGENT_ID,
            data: None,
            error: Some(outcome.reply()),
        }
    };

    Json(response)
}
