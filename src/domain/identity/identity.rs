//! Identity aggregate entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IdentityId, Timestamp};

use super::EmailAddress;

/// Display name used when a session reaches the email step without a
/// recorded name.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// A user record keyed by email address.
///
/// # Invariants
///
/// - `email` is unique across identities and case-normalized
/// - `verified` flips false→true only through code consumption and never
///   back
/// - Identities are never deleted by this subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: IdentityId,
    email: EmailAddress,
    display_name: String,
    verified: bool,
    created_at: Timestamp,
}

impl Identity {
    /// Creates a new unverified identity.
    pub fn new(email: EmailAddress, display_name: impl Into<String>) -> Self {
        Self {
            id: IdentityId::new(),
            email,
            display_name: display_name.into(),
            verified: false,
            created_at: Timestamp::now(),
        }
    }

    /// Returns the identity id.
    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Returns the normalized email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns true once the email has been proven by code consumption.
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Marks the identity as verified. Idempotent.
    pub fn mark_verified(&mut self) {
        self.verified = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> EmailAddress {
        EmailAddress::parse("jo@x.com").unwrap()
    }

    #[test]
    fn new_identity_starts_unverified() {
        let identity = Identity::new(email(), "Jo");
        assert!(!identity.is_verified());
        assert_eq!(identity.display_name(), "Jo");
        assert_eq!(identity.email().as_str(), "jo@x.com");
    }

    #[test]
    fn mark_verified_flips_flag() {
        let mut identity = Identity::new(email(), "Jo");
        identity.mark_verified();
        assert!(identity.is_verified());
    }

    #[test]
    fn mark_verified_is_idempotent() {
        let mut identity = Identity::new(email(), "Jo");
        identity.mark_verified();
        identity.mark_verified();
        assert!(identity.is_verified());
    }
}
