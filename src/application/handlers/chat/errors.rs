//! Chat handler errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors surfaced by the chat handlers.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session_id is required")]
    SessionIdRequired,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("This session is not awaiting a verification code")]
    NotAwaitingCode,

    #[error("{0}")]
    Infrastructure(String),
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => ChatError::SessionNotFound(err.message),
            ErrorCode::NotAwaitingCode => ChatError::NotAwaitingCode,
            _ => ChatError::Infrastructure(err.message),
        }
    }
}
