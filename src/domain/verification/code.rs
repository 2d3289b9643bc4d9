//! Verification code entity and validity rules.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CodeId, IdentityId, Timestamp};

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Default validity window for an issued code.
pub const DEFAULT_CODE_TTL_MINUTES: i64 = 10;

/// Generates a uniformly random numeric code, leading zeros allowed.
pub fn generate_code(rng: &mut impl Rng) -> String {
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Outcome of checking a submitted code against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// An unused, fresh code matched and was consumed.
    Valid,
    /// An unused code matched but its validity window has passed.
    /// The code stays unused; a fresh issuance is required.
    Expired,
    /// No unused code with these digits exists for the identity.
    NotFound,
}

/// A time-limited, single-use numeric credential tied to one identity.
///
/// # Invariants
///
/// - `used` is monotonic false→true, never reset
/// - Valid iff `!used && now - created_at < ttl`
/// - Historical (used) codes are retained for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    id: CodeId,
    identity_id: IdentityId,
    code: String,
    created_at: Timestamp,
    used: bool,
}

impl VerificationCode {
    /// Issues a new unused code for an identity.
    pub fn issue(identity_id: IdentityId, code: String) -> Self {
        Self {
            id: CodeId::new(),
            identity_id,
            code,
            created_at: Timestamp::now(),
            used: false,
        }
    }

    /// Returns the code id.
    pub fn id(&self) -> &CodeId {
        &self.id
    }

    /// Returns the owning identity.
    pub fn identity_id(&self) -> &IdentityId {
        &self.identity_id
    }

    /// Returns the code digits.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the issuance timestamp.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true once the code has been consumed.
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Returns true if the digits match and the code is still unconsumed.
    pub fn matches_unused(&self, identity_id: &IdentityId, submitted: &str) -> bool {
        !self.used && &self.identity_id == identity_id && self.code == submitted
    }

    /// Returns true while `now` is strictly inside the validity window.
    ///
    /// At exactly `ttl_minutes` of age the code is no longer fresh.
    pub fn is_fresh(&self, now: &Timestamp, ttl_minutes: i64) -> bool {
        now.duration_since(&self.created_at) < chrono::Duration::minutes(ttl_minutes)
    }

    /// Consumes the code. The flag never resets.
    pub fn consume(&mut self) {
        self.used = true;
    }

    /// Rewinds the issuance timestamp, for tests exercising expiry.
    pub fn backdate(&mut self, minutes: i64) {
        self.created_at = self.created_at.minus_minutes(minutes);
    }
}

/// Returns true if a submitted message has the shape of a code:
/// exactly [`CODE_LENGTH`] ASCII digits.
pub fn looks_like_code(message: &str) -> bool {
    message.len() == CODE_LENGTH && message.bytes().all(|b| b.is_ascii_digit())
}
