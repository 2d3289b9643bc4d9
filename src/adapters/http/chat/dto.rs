//! HTTP DTOs for the chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{ChatReply, ResendReply};

/// One inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Reply to a chat message; carries the session id to send back.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
    pub step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        let (redirect_url, button_text) = match reply.redirect {
            Some(redirect) => (Some(redirect.url), Some(redirect.button_text)),
            None => (None, None),
        };
        Self {
            reply: reply.reply,
            session_id: reply.session_id.to_string(),
            step: reply.step.as_str().to_string(),
            redirect_url,
            button_text,
        }
    }
}

/// Request to resend a verification code.
#[derive(Debug, Clone, Deserialize)]
pub struct ResendRequest {
    pub session_id: String,
}

/// Confirmation after a resend.
#[derive(Debug, Clone, Serialize)]
pub struct ResendResponse {
    pub message: String,
    pub session_id: String,
}

impl From<ResendReply> for ResendResponse {
    fn from(reply: ResendReply) -> Self {
        Self {
            message: reply.message,
            session_id: reply.session_id.to_string(),
        }
    }
}

/// Service descriptor served at the root path.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

impl ServiceInfoResponse {
    pub fn current() -> Self {
        Self {
            name: "StudyGlobal Intake API",
            version: env!("CARGO_PKG_VERSION"),
            endpoints: vec!["POST /api/chat", "POST /api/resend-otp"],
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
