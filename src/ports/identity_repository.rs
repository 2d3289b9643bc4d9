//! Identity repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, IdentityId};
use crate::domain::identity::{EmailAddress, Identity};

/// Repository port for identity persistence, keyed by normalized email.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find an identity by its id. Returns `None` if unknown.
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, DomainError>;

    /// Find an identity by normalized email. Returns `None` if unknown.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, DomainError>;

    /// Insert or replace an identity.
    ///
    /// Email uniqueness is the implementation's responsibility: saving an
    /// identity whose email belongs to a different id is a `StoreError`.
    async fn save(&self, identity: &Identity) -> Result<(), DomainError>;
}
