//! Resend-backed mailer.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::identity::EmailAddress;
use crate::ports::Mailer;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Mailer delivering through the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from_header: String,
}

impl ResendMailer {
    /// Creates a mailer from the email configuration.
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.resend_api_key.clone(),
            from_header: config.from_header(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(
        &self,
        to: &EmailAddress,
        subject: &str,
        body: &str,
    ) -> Result<(), DomainError> {
        let request = SendEmailRequest {
            from: &self.from_header,
            to: [to.as_str()],
            subject,
            text: body,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                DomainError::new(ErrorCode::MailError, format!("Resend request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(
                DomainError::new(ErrorCode::MailError, format!("Resend returned {status}"))
                    .with_detail("body", detail),
            );
        }

        tracing::debug!(to = %to, subject = %subject, "email dispatched via Resend");
        Ok(())
    }
}
