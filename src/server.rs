// src/server.rs
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::RelayConfig;
use crate::logging::RequestLogger;
use crate::routes::create_router;
use crate::state::AppState;

pub struct RelayServer {
    listener: UnixListener,
    app: Router,
    socket_path: PathBuf,
    shutdown: CancellationToken,
}

impl RelayServer {
    /// Removes whatever sits at the socket path, then binds the listener.
    pub fn bind(
        config: &RelayConfig,
        logger: RequestLogger,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let state = AppState::from_config(config, shutdown.clone())
            .context("failed to build upstream client")?;
        let app = create_router(logger).with_state(Arc::new(state));

        let listener = listen(&config.socket_path)
            .with_context(|| format!("failed to bind {}", config.socket_path.display()))?;
        info!("Starting listening on {}", config.socket_path.display());

        Ok(Self {
            listener,
            app,
            socket_path: config.socket_path.clone(),
            shutdown,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Serves until the shutdown token fires, then drains open connections.
    pub async fn run(self) -> io::Result<()> {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(self.shutdown.cancelled_owned())
            .await?;
        info!("Stopped listening on {}", self.socket_path.display());
        Ok(())
    }
}

pub fn listen(path: &Path) -> io::Result<UnixListener> {
    remove_stale_socket(path);
    UnixListener::bind(path)
}

fn remove_stale_socket(path: &Path) {
    let removed = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(_) => return,
    };
    if let Err(e) = removed {
        tracing::debug!("could not remove {}: {}", path.display(), e);
    }
}

/// Cancels `token` on Ctrl-C or SIGTERM.
pub async fn shutdown_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
    token.cancel();
}
