//! HTTP routes for the chat endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{process_chat, resend_otp, service_info, ChatHandlers};

/// Creates the chat router with all endpoints.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/api/chat", post(process_chat))
        .route("/api/resend-otp", post(resend_otp))
        .with_state(handlers)
}
