//! In-memory session repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::ChatSession;
use crate::ports::SessionRepository;

/// Session store backed by a locked map.
///
/// The write lock serializes saves per process, and the version check
/// rejects any save whose transition was computed from an outdated read,
/// so a racing request can never overwrite a committed transition.
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, ChatSession>>,
}

impl InMemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored sessions (for test assertions).
    pub fn len(&self) -> usize {
        self.sessions.read().expect("session lock poisoned").len()
    }

    /// True when no session has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<ChatSession>, DomainError> {
        Ok(self
            .sessions
            .read()
            .expect("session lock poisoned")
            .get(id)
            .cloned())
    }

    async fn save(&self, session: &ChatSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        if let Some(stored) = sessions.get(session.id()) {
            // A transition computed from the stored state carries version
            // stored + 1. Anything at or below the stored version was
            // built on a read that another request has since superseded.
            if session.version() <= stored.version() {
                return Err(DomainError::new(
                    ErrorCode::StaleWrite,
                    "A newer version of this session is already stored",
                )
                .with_detail("stored_version", stored.version().to_string())
                .with_detail("submitted_version", session.version().to_string()));
            }
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }
}
