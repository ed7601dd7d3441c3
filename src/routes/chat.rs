use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{
    error::AppError,
    message::{ChatRequest, HelloResponse},
    state::SharedState,
};

pub async fn hello_handler() -> Json<HelloResponse> {
    Json(HelloResponse::hello())
}

pub async fn chat_status_handler() -> &'static str {
    "ok"
}

// Relays the message and answers 200 with the upstream body, whatever status upstream used.
pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;

    let relayed = state
        .upstream
        .relay(&payload, &state.shutdown)
        .await
        .inspect_err(|e| warn!(url = %state.upstream.url(), "chat relay failed: {}", e))?;

    let content_type = relayed
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("text/plain; charset=utf-8"));

    Ok((StatusCode::OK, [(CONTENT_TYPE, content_type)], relayed.body).into_response())
}
