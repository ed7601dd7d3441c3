// src/services/upstream.rs
use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::message::ChatRequest;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to encode chat request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("failed to read upstream response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("upstream request cancelled")]
    Cancelled,
}

/// Body and content type returned by the chat API.
#[derive(Debug)]
pub struct Relayed {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url: url.into(), timeout })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Forwards the request and returns the upstream body untouched.
    /// Resolves early with `Cancelled` once `cancel` fires.
    pub async fn relay(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<Relayed, UpstreamError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(UpstreamError::Cancelled),
            result = self.send(request) => result,
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<Relayed, UpstreamError> {
        let payload = serde_json::to_vec(request)?;

        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| self.classify(e, UpstreamError::Transport))?;

        let status = response.status();
        if !status.is_success() {
            // Relayed as-is; the caller always gets 200.
            warn!(%status, url = %self.url, "upstream answered with non-success status");
        }

        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify(e, UpstreamError::Body))?;

        debug!(bytes = body.len(), "relayed upstream response");
        Ok(Relayed { content_type, body })
    }

    fn classify(
        &self,
        err: reqwest::Error,
        otherwise: fn(reqwest::Error) -> UpstreamError,
    ) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            otherwise(err)
        }
    }
}
