//! In-memory verification code store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, IdentityId, Timestamp};
use crate::domain::verification::{CodeCheck, VerificationCode};
use crate::ports::VerificationStore;

/// Code store keeping every issued code per identity, historical ones
/// included.
///
/// A single mutex covers lookup and consumption, making
/// `validate_and_consume` the atomic conditional update the flow relies
/// on: two racing submissions of the same code serialize on the lock and
/// the second finds `used == true`.
pub struct InMemoryVerificationStore {
    codes: Mutex<HashMap<IdentityId, Vec<VerificationCode>>>,
    ttl_minutes: i64,
}

impl InMemoryVerificationStore {
    /// Creates an empty store with the given validity window.
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            ttl_minutes,
        }
    }

    /// Number of unused codes outstanding for an identity (for test
    /// assertions).
    pub fn unused_count(&self, identity_id: &IdentityId) -> usize {
        self.codes
            .lock()
            .expect("code lock poisoned")
            .get(identity_id)
            .map(|codes| codes.iter().filter(|c| !c.is_used()).count())
            .unwrap_or(0)
    }

    /// Rewinds issuance timestamps for an identity's unused codes, for
    /// tests exercising the expiry path.
    pub fn backdate_codes(&self, identity_id: &IdentityId, minutes: i64) {
        let mut codes = self.codes.lock().expect("code lock poisoned");
        if let Some(codes) = codes.get_mut(identity_id) {
            for code in codes.iter_mut().filter(|c| !c.is_used()) {
                code.backdate(minutes);
            }
        }
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn store(&self, code: VerificationCode) -> Result<(), DomainError> {
        self.codes
            .lock()
            .expect("code lock poisoned")
            .entry(*code.identity_id())
            .or_default()
            .push(code);
        Ok(())
    }

    async fn validate_and_consume(
        &self,
        identity_id: &IdentityId,
        submitted: &str,
    ) -> Result<CodeCheck, DomainError> {
        let now = Timestamp::now();
        let mut codes = self.codes.lock().expect("code lock poisoned");

        let Some(candidates) = codes.get_mut(identity_id) else {
            return Ok(CodeCheck::NotFound);
        };
        let Some(code) = candidates
            .iter_mut()
            .find(|c| c.matches_unused(identity_id, submitted))
        else {
            return Ok(CodeCheck::NotFound);
        };

        if !code.is_fresh(&now, self.ttl_minutes) {
            // Stays unused; the user must request a new one
            return Ok(CodeCheck::Expired);
        }

        code.consume();
        Ok(CodeCheck::Valid)
    }
}
