//! Chat session aggregate entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, IdentityId, SessionId, Timestamp};

use super::{DataBag, DataKey, Step};

/// Per-conversation state: current step plus the accumulated data bag.
///
/// # Invariants
///
/// - `identity_id` is set at most once and never cleared
/// - The step and bag together fully determine conversational context
/// - `updated_at` moves forward and `version` increments on every applied
///   transition; `version` is what the store compares for staleness, so a
///   save built on an outdated read carries the outdated version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    id: SessionId,
    identity_id: Option<IdentityId>,
    step: Step,
    data: DataBag,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ChatSession {
    /// Creates a fresh session at the greeting step.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            identity_id: None,
            step: Step::Greeting,
            data: DataBag::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the linked identity, once the email step has completed.
    pub fn identity_id(&self) -> Option<&IdentityId> {
        self.identity_id.as_ref()
    }

    /// Returns the current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Returns the data bag.
    pub fn data(&self) -> &DataBag {
        &self.data
    }

    /// Returns the transition count, used as an optimistic-concurrency
    /// token by the session store.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns the last-update timestamp.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Links the session to an identity.
    ///
    /// Relinking to the same identity is a no-op (client retries of the
    /// email step hit this path).
    ///
    /// # Errors
    ///
    /// - `IdentityAlreadyLinked` if a different identity is already linked
    pub fn link_identity(&mut self, identity_id: IdentityId) -> Result<(), DomainError> {
        match self.identity_id {
            None => {
                self.identity_id = Some(identity_id);
                Ok(())
            }
            Some(existing) if existing == identity_id => Ok(()),
            Some(_) => Err(DomainError::new(
                ErrorCode::IdentityAlreadyLinked,
                "Session is already linked to a different identity",
            )),
        }
    }

    /// Applies a computed transition: moves to the next step, merges the
    /// data delta into the bag, and bumps the version so a save built on
    /// the pre-transition read can be told apart from one built on a
    /// concurrent, already-committed transition.
    pub fn apply(&mut self, next_step: Step, delta: impl IntoIterator<Item = (DataKey, String)>) {
        for (key, value) in delta {
            self.data.set(key, value);
        }
        self.step = next_step;
        self.version += 1;
        self.updated_at = Timestamp::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_at_greeting_with_empty_bag() {
        let session = ChatSession::new();
        assert_eq!(session.step(), Step::Greeting);
        assert!(session.data().is_empty());
        assert!(session.identity_id().is_none());
    }

    #[test]
    fn apply_moves_step_and_merges_delta() {
        let mut session = ChatSession::new();
        session.apply(Step::Email, vec![(DataKey::Name, "Jo".to_string())]);
        assert_eq!(session.step(), Step::Email);
        assert_eq!(session.data().get(DataKey::Name), Some("Jo"));
    }

    #[test]
    fn apply_with_empty_delta_only_moves_step() {
        let mut session = ChatSession::new();
        session.apply(Step::Name, vec![]);
        assert_eq!(session.step(), Step::Name);
        assert!(session.data().is_empty());
    }

    #[test]
    fn apply_advances_updated_at() {
        let mut session = ChatSession::new();
        let before = *session.updated_at();
        session.apply(Step::Name, vec![]);
        assert!(!session.updated_at().is_before(&before));
    }

    #[test]
    fn apply_increments_version_each_transition() {
        let mut session = ChatSession::new();
        assert_eq!(session.version(), 0);
        session.apply(Step::Name, vec![]);
        assert_eq!(session.version(), 1);
        session.apply(Step::Email, vec![(DataKey::Name, "Jo".to_string())]);
        assert_eq!(session.version(), 2);
    }

    #[test]
    fn clones_applied_independently_diverge_in_version_only_once() {
        let mut session = ChatSession::new();
        session.apply(Step::Name, vec![]);
        let mut stale_read = session.clone();

        session.apply(Step::Email, vec![]);
        stale_read.apply(Step::Otp, vec![]);

        // Both transitions were built on the same read, so they claim the
        // same version and the store can only accept one of them.
        assert_eq!(session.version(), stale_read.version());
    }

    #[test]
    fn link_identity_sets_once() {
        let mut session = ChatSession::new();
        let id = IdentityId::new();
        session.link_identity(id).unwrap();
        assert_eq!(session.identity_id(), Some(&id));
    }

    #[test]
    fn relinking_same_identity_is_noop() {
        let mut session = ChatSession::new();
        let id = IdentityId::new();
        session.link_identity(id).unwrap();
        assert!(session.link_identity(id).is_ok());
    }

    #[test]
    fn linking_different_identity_fails() {
        let mut session = ChatSession::new();
        session.link_identity(IdentityId::new()).unwrap();
        let err = session.link_identity(IdentityId::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::IdentityAlreadyLinked);
    }
}
