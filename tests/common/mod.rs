#![allow(dead_code)]

use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::post,
};
use chat_relay_backend::logging::{RequestLogEntry, RequestLogger};
use chat_relay_backend::services::upstream::UpstreamClient;
use chat_relay_backend::state::{AppState, SharedState};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct FakeUpstreamState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    status: StatusCode,
    reply: &'static str,
    delay: Duration,
}

/// A local stand-in for the remote chat API that records every POST it gets.
pub struct FakeUpstream {
    pub url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeUpstream {
    pub async fn start(status: StatusCode, reply: &'static str) -> Self {
        Self::start_with_delay(status, reply, Duration::ZERO).await
    }

    pub async fn start_with_delay(
        status: StatusCode,
        reply: &'static str,
        delay: Duration,
    ) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = FakeUpstreamState {
            calls: calls.clone(),
            status,
            reply,
            delay,
        };
        let app = Router::new().route("/chat", post(record)).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/chat", addr),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<FakeUpstreamState>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.calls.lock().unwrap().push(RecordedCall {
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    });
    tokio::time::sleep(state.delay).await;
    (state.status, [(CONTENT_TYPE, "application/json")], state.reply)
}

/// Accepts one connection and hands the raw stream to `serve`, for upstream
/// misbehavior an axum handler cannot produce.
pub async fn raw_upstream<F, Fut>(serve: F) -> String
where
    F: FnOnce(TcpStream) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        serve(stream).await;
    });
    format!("http://{}/chat", addr)
}

/// Reads until the JSON body of a chat request has arrived.
pub async fn read_chat_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    while !received.ends_with(b"}") {
        let n = stream.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before the request body arrived");
        received.extend_from_slice(&buf[..n]);
    }
    received
}

/// URL of a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/chat", addr)
}

pub fn app_state(url: &str, timeout: Duration) -> SharedState {
    app_state_with_shutdown(url, timeout, CancellationToken::new())
}

pub fn app_state_with_shutdown(
    url: &str,
    timeout: Duration,
    shutdown: CancellationToken,
) -> SharedState {
    let upstream = UpstreamClient::new(url, timeout).unwrap();
    Arc::new(AppState::new(upstream, shutdown))
}

/// In-memory sink for the request logger.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn logger(&self) -> RequestLogger {
        RequestLogger::new(self.clone())
    }

    pub fn entries(&self) -> Vec<RequestLogEntry> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
