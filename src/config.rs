// src/config.rs
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_SOCKET_PATH: &str = "/run/guest-services/backend.sock";
pub const DEFAULT_UPSTREAM_URL: &str = "https://docker-ai-ass.onrender.com/chat";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(about = "Relays chat messages from a local Unix socket to the remote chat API")]
pub struct Cli {
    /// Unix domain socket to listen on
    #[arg(long, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,
}

impl Cli {
    /// Parses arguments, also accepting the single-dash `-socket` spelling.
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(args.into_iter().map(|arg| normalize_flag(arg.into())))
    }
}

fn normalize_flag(arg: OsString) -> OsString {
    match arg.to_str() {
        Some(s) if s == "-socket" || s.starts_with("-socket=") => format!("-{s}").into(),
        _ => arg,
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub socket_path: PathBuf,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

impl From<Cli> for RelayConfig {
    fn from(cli: Cli) -> Self {
        Self {
            socket_path: cli.socket,
            ..Self::default()
        }
    }
}
