//! HTTP handlers for the chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{
    ChatError, ProcessMessageCommand, ProcessMessageHandler, ResendCodeCommand, ResendCodeHandler,
};

use super::dto::{
    ChatRequest, ChatResponse, ErrorResponse, ResendRequest, ResendResponse, ServiceInfoResponse,
};

/// Shared state for the chat routes.
#[derive(Clone)]
pub struct ChatHandlers {
    process_handler: Arc<ProcessMessageHandler>,
    resend_handler: Arc<ResendCodeHandler>,
}

impl ChatHandlers {
    pub fn new(
        process_handler: Arc<ProcessMessageHandler>,
        resend_handler: Arc<ResendCodeHandler>,
    ) -> Self {
        Self {
            process_handler,
            resend_handler,
        }
    }
}

/// POST /api/chat - Process one chat message
pub async fn process_chat(
    State(handlers): State<ChatHandlers>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return malformed_body(rejection),
    };

    let cmd = ProcessMessageCommand {
        session_id: req.session_id,
        message: req.message,
    };

    match handlers.process_handler.handle(cmd).await {
        Ok(reply) => {
            let response: ChatResponse = reply.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

/// POST /api/resend-otp - Resend a verification code
pub async fn resend_otp(
    State(handlers): State<ChatHandlers>,
    payload: Result<Json<ResendRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => return malformed_body(rejection),
    };

    let cmd = ResendCodeCommand {
        session_id: req.session_id,
    };

    match handlers.resend_handler.handle(cmd).await {
        Ok(reply) => {
            let response: ResendResponse = reply.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_chat_error(e),
    }
}

/// GET / - Service descriptor
pub async fn service_info() -> Response {
    (StatusCode::OK, Json(ServiceInfoResponse::current())).into_response()
}

fn malformed_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(rejection.body_text())),
    )
        .into_response()
}

fn handle_chat_error(error: ChatError) -> Response {
    match error {
        ChatError::SessionIdRequired => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("session_id is required")),
        )
            .into_response(),
        ChatError::SessionNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Session", &id)),
        )
            .into_response(),
        ChatError::NotAwaitingCode => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(
                "This session is not awaiting a verification code",
            )),
        )
            .into_response(),
        ChatError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "chat handler infrastructure failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}
