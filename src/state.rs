// src/state.rs
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::services::upstream::UpstreamClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub upstream: UpstreamClient,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(upstream: UpstreamClient, shutdown: CancellationToken) -> Self {
        Self { upstream, shutdown }
    }

    pub fn from_config(config: &RelayConfig, shutdown: CancellationToken) -> reqwest::Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream_url, config.upstream_timeout)?;
        Ok(Self::new(upstream, shutdown))
    }
}
