//! Session repository port.
//!
//! Persists chat sessions between HTTP requests. The saved step must be
//! visible to the next request before the response referencing it is
//! returned — no eventual-consistency window.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::ChatSession;

/// Repository port for chat session persistence.
///
/// Implementations must serialize writes per session id with a
/// conditional update on the session version: a save whose version does
/// not advance past the stored one was computed from an outdated read
/// and must be rejected with `StaleWrite` rather than applied over a
/// concurrently committed transition.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by its id. Returns `None` if unknown.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<ChatSession>, DomainError>;

    /// Persist the session's step, data bag, and identity reference.
    ///
    /// # Errors
    ///
    /// - `StaleWrite` if a newer version of the session is already stored
    /// - `StoreError` on persistence failure
    async fn save(&self, session: &ChatSession) -> Result<(), DomainError>;
}
