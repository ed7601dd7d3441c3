use chat_relay_backend::config::{Cli, RelayConfig};
use chat_relay_backend::logging::RequestLogger;
use chat_relay_backend::server::{RelayServer, shutdown_on_signal};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = RelayConfig::from(Cli::parse_args(std::env::args_os()));
    let shutdown = CancellationToken::new();

    let server = RelayServer::bind(&config, RequestLogger::stdout(), shutdown.clone())
        .inspect_err(|e| tracing::error!("{:#}", e))?;

    tokio::spawn(shutdown_on_signal(shutdown));
    server.run().await?;
    Ok(())
}
