// src/logging.rs
//! Per-request access log, one JSON object per line.
//!
//! The logger owns its sink and is handed to the router at startup, so tests
//! can capture lines in memory instead of reading stdout.

use std::io::Write;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ErrorDetail;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub time: String,
    pub id: String,
    pub method: String,
    pub uri: String,
    pub status: u16,
    pub error: String,
}

#[derive(Clone)]
pub struct RequestLogger {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl RequestLogger {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn log(&self, entry: &RequestLogEntry) {
        let mut line = match serde_json::to_vec(entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("failed to encode request log entry: {}", e);
                return;
            }
        };
        line.push(b'\n');

        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = sink.write_all(&line).and_then(|_| sink.flush()) {
            tracing::warn!("failed to write request log entry: {}", e);
        }
    }
}

/// Middleware writing one log line per request once the response is built.
pub async fn log_requests(
    State(logger): State<RequestLogger>,
    req: Request,
    next: Next,
) -> Response {
    let id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let uri = req.uri().to_string();

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    let error = response
        .extensions()
        .get::<ErrorDetail>()
        .map(|detail| detail.0.clone())
        .unwrap_or_default();

    logger.log(&RequestLogEntry {
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
        id,
        method,
        uri,
        status: response.status().as_u16(),
        error,
    });

    response
}
