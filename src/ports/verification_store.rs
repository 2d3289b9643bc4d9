//! Verification store port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, IdentityId};
use crate::domain::verification::{CodeCheck, VerificationCode};

/// Store port for issued verification codes.
///
/// Codes are the one point of true cross-request races (duplicate submissions,
/// concurrent resend + submit), so `validate_and_consume` must be a single
/// atomic conditional update: check `used == false` and mark `used = true`
/// in one step, guaranteeing at-most-once successful validation per code.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Persist a freshly issued code.
    async fn store(&self, code: VerificationCode) -> Result<(), DomainError>;

    /// Look up an unused code matching (identity, digits) and consume it.
    ///
    /// - No match → `NotFound`
    /// - Match older than the store's TTL → `Expired`; the code stays
    ///   unused (a fresh issuance is required, not a retry)
    /// - Fresh match → atomically marked used, `Valid`
    async fn validate_and_consume(
        &self,
        identity_id: &IdentityId,
        submitted: &str,
    ) -> Result<CodeCheck, DomainError>;
}
