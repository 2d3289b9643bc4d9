//! In-memory identity repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, IdentityId};
use crate::domain::identity::{EmailAddress, Identity};
use crate::ports::IdentityRepository;

/// Identity store backed by locked maps, with an email index enforcing
/// one identity per normalized address.
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<IdentityId, Identity>>,
    by_email: RwLock<HashMap<EmailAddress, IdentityId>>,
}

impl InMemoryIdentityRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            identities: RwLock::new(HashMap::new()),
            by_email: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryIdentityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, DomainError> {
        Ok(self
            .identities
            .read()
            .expect("identity lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, DomainError> {
        let by_email = self.by_email.read().expect("email index lock poisoned");
        let Some(id) = by_email.get(email) else {
            return Ok(None);
        };
        Ok(self
            .identities
            .read()
            .expect("identity lock poisoned")
            .get(id)
            .cloned())
    }

    async fn save(&self, identity: &Identity) -> Result<(), DomainError> {
        let mut by_email = self.by_email.write().expect("email index lock poisoned");
        if let Some(existing) = by_email.get(identity.email()) {
            if existing != identity.id() {
                return Err(DomainError::new(
                    ErrorCode::StoreError,
                    "Email already belongs to a different identity",
                ));
            }
        }
        by_email.insert(identity.email().clone(), *identity.id());
        self.identities
            .write()
            .expect("identity lock poisoned")
            .insert(*identity.id(), identity.clone());
        Ok(())
    }
}
