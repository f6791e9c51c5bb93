//! HTTP route handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::agent::{Agent, AgentError};
use crate::tools::{ToolDescriptor, ToolRegistry};

use super::types::{ErrorResponse, HealthResponse, QueryRequest, QueryResponse};

/// Application state shared across handlers. Built once at startup; the
/// agent and registry are read-only from here on.
pub struct AppState {
    pub agent: Agent,
    pub tools: Arc<ToolRegistry>,
}

/// POST `/query`: run one question through the agent loop.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, chars = request.question.len(), "handling query");

    match state.agent.answer(&request.question).await {
        Ok(answer) => {
            tracing::info!(%request_id, chars = answer.len(), "query answered");
            (StatusCode::OK, Json(QueryResponse { answer })).into_response()
        }
        Err(err) => {
            tracing::error!(%request_id, error = %err, "query failed");
            let (status, kind) = error_parts(&err);
            (status, Json(ErrorResponse::new(kind, err.to_string()))).into_response()
        }
    }
}

/// Map a request failure to a status code and a stable error kind.
fn error_parts(err: &AgentError) -> (StatusCode, &'static str) {
    match err {
        AgentError::ReasoningUnavailable(_) => (StatusCode::BAD_GATEWAY, "reasoning_unavailable"),
        AgentError::IterationLimitExceeded { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "iteration_limit_exceeded")
        }
    }
}

/// GET `/health`: liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET `/tools`: the advertised tool catalog.
pub async fn tools(State(state): State<Arc<AppState>>) -> Json<Vec<ToolDescriptor>> {
    Json(state.tools.descriptors())
}
