//! Mailer port - outbound notification channel.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::identity::EmailAddress;

/// Sends a message to an address via an external channel.
///
/// Callers log and swallow errors: a failed send never blocks or reverses
/// a state transition, since the user can request a resend.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a plain-text message.
    ///
    /// # Errors
    ///
    /// - `MailError` if the channel rejects or cannot reach the address
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), DomainError>;
}
