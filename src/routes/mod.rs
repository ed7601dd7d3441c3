// src/routes/mod.rs
pub mod chat;

use crate::logging::{RequestLogger, log_requests};
use crate::state::SharedState;
use axum::{Router, middleware, routing::get};
use chat::{chat_handler, chat_status_handler, hello_handler};
use tower_http::trace::TraceLayer;

pub fn create_router(logger: RequestLogger) -> Router<SharedState> {
    Router::new()
        .route("/hello", get(hello_handler))
        .route("/chat", get(chat_status_handler).post(chat_handler))
        .layer(middleware::from_fn_with_state(logger, log_requests))
        .layer(TraceLayer::new_for_http())
}
