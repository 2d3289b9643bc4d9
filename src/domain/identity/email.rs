//! Email address value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Case-normalized email address.
///
/// # Invariants
///
/// - Contains an `@`
/// - The part after the last `@` contains a `.`
/// - Stored lower-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalizes an email address.
    ///
    /// The check is deliberately shallow: the address is proven by the
    /// verification code that gets mailed to it, not by syntax.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if there is no `@`, or no `.` after the last `@`
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let Some((_, domain)) = trimmed.rsplit_once('@') else {
            return Err(ValidationError::invalid_format("email", "missing @"));
        };
        if !domain.contains('.') {
            return Err(ValidationError::invalid_format(
                "email",
                "missing . in domain",
            ));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
