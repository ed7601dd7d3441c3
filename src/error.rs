// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::services::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Decode(#[from] JsonRejection),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Error text attached to failed responses so the request log can report it.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Decode(rejection) => rejection.status(),
            AppError::Upstream(UpstreamError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(UpstreamError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream(UpstreamError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(UpstreamError::Transport(_) | UpstreamError::Body(_)) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Decode(rejection) => rejection.body_text(),
            AppError::Upstream(err) => err.to_string(),
        };

        let mut response = (status, Json(ErrorBody { message: message.clone() })).into_response();
        response.extensions_mut().insert(ErrorDetail(message));
        response
    }
}
