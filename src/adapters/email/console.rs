//! Console mailer for local development.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::identity::EmailAddress;
use crate::ports::Mailer;

/// Mailer that logs messages instead of delivering them.
///
/// Used when no Resend API key is configured so the full verification
/// flow can be exercised locally, reading the code off the logs.
#[derive(Debug, Default, Clone)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), DomainError> {
        tracing::info!(to = %to, subject = %subject, body = %body, "console mail");
        Ok(())
    }
}
