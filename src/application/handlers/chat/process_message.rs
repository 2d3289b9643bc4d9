//! ProcessMessageHandler - one user message in, one reply out.

use std::sync::Arc;

use crate::domain::conversation::{ConversationEngine, EngineOutput, Redirect, Transition};
use crate::domain::foundation::{DomainError, ErrorCode, IdentityId, SessionId};
use crate::domain::identity::{EmailAddress, Identity, FALLBACK_DISPLAY_NAME};
use crate::domain::session::{ChatSession, DataBag, DataKey, Step};
use crate::domain::verification::{generate_code, CodeCheck, VerificationCode};
use crate::ports::{IdentityRepository, Mailer, SessionRepository, VerificationStore};

use super::ChatError;

pub(super) const VERIFICATION_SUBJECT: &str = "StudyGlobal Verification Code";

/// Plain-text body for a verification mail.
pub(super) fn verification_body(code: &str, ttl_minutes: i64) -> String {
    format!(
        "Your verification code is: {}\n\nThis code will expire in {} minutes.",
        code, ttl_minutes
    )
}

/// Command to process one chat message.
#[derive(Debug, Clone)]
pub struct ProcessMessageCommand {
    /// Session id from the client; absent, blank, or unknown starts fresh.
    pub session_id: Option<String>,
    pub message: String,
}

/// Reply for the client, echoing the session id to carry forward.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: SessionId,
    pub step: Step,
    pub redirect: Option<Redirect>,
}

/// Handler advancing a chat session by one message.
///
/// The engine decides the transition; this handler performs the side
/// effects the email and otp steps delegate (identity resolution, code
/// issuance, code validation) and persists the applied transition.
pub struct ProcessMessageHandler {
    sessions: Arc<dyn SessionRepository>,
    identities: Arc<dyn IdentityRepository>,
    codes: Arc<dyn VerificationStore>,
    mailer: Arc<dyn Mailer>,
    engine: ConversationEngine,
    code_ttl_minutes: i64,
}

impl ProcessMessageHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        identities: Arc<dyn IdentityRepository>,
        codes: Arc<dyn VerificationStore>,
        mailer: Arc<dyn Mailer>,
        engine: ConversationEngine,
        code_ttl_minutes: i64,
    ) -> Self {
        Self {
            sessions,
            identities,
            codes,
            mailer,
            engine,
            code_ttl_minutes,
        }
    }

    pub async fn handle(&self, cmd: ProcessMessageCommand) -> Result<ChatReply, ChatError> {
        let mut session = self.resolve_session(cmd.session_id.as_deref()).await?;

        let output = match self.engine.advance(session.step(), session.data(), &cmd.message) {
            Transition::Complete(output) => output,

            Transition::StartVerification { email, output } => {
                let identity = self.resolve_identity(&email, session.data()).await?;
                session.link_identity(*identity.id())?;
                self.issue_and_send(&identity, VERIFICATION_SUBJECT).await?;
                output
            }

            Transition::SubmitCode { code } => {
                let check = match session.identity_id() {
                    // A session can only reach the otp step through the
                    // email step, but fail closed if the link is missing.
                    None => CodeCheck::NotFound,
                    Some(identity_id) => {
                        let check = self.codes.validate_and_consume(identity_id, &code).await?;
                        if check == CodeCheck::Valid {
                            self.mark_verified(identity_id).await?;
                        }
                        check
                    }
                };
                self.engine.resolve_code(check)
            }
        };

        let EngineOutput {
            reply,
            next_step,
            delta,
            redirect,
        } = output;

        session.apply(next_step, delta);
        self.sessions.save(&session).await?;

        tracing::debug!(
            session_id = %session.id(),
            step = next_step.as_str(),
            "session advanced"
        );

        Ok(ChatReply {
            reply,
            session_id: *session.id(),
            step: next_step,
            redirect,
        })
    }

    /// Resolves the client-supplied session id, falling back to a fresh
    /// greeting-step session for absent, malformed, or unknown ids.
    async fn resolve_session(&self, session_id: Option<&str>) -> Result<ChatSession, DomainError> {
        let Some(raw) = session_id.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(ChatSession::new());
        };
        let Ok(id) = raw.parse::<SessionId>() else {
            return Ok(ChatSession::new());
        };
        Ok(self
            .sessions
            .find_by_id(&id)
            .await?
            .unwrap_or_else(ChatSession::new))
    }

    /// Finds the identity for this email or creates an unverified one,
    /// naming it from the session's collected name.
    async fn resolve_identity(
        &self,
        email: &EmailAddress,
        data: &DataBag,
    ) -> Result<Identity, DomainError> {
        if let Some(existing) = self.identities.find_by_email(email).await? {
            return Ok(existing);
        }
        let display_name = data.get(DataKey::Name).unwrap_or(FALLBACK_DISPLAY_NAME);
        let identity = Identity::new(email.clone(), display_name);
        self.identities.save(&identity).await?;
        Ok(identity)
    }

    /// Issues a fresh code and dispatches it.
    ///
    /// Mail dispatch is fail-open: the code is stored and the step
    /// advances even if delivery fails, since the user can resend.
    async fn issue_and_send(
        &self,
        identity: &Identity,
        subject: &str,
    ) -> Result<(), DomainError> {
        let digits = generate_code(&mut rand::thread_rng());
        let code = VerificationCode::issue(*identity.id(), digits.clone());
        self.codes.store(code).await?;

        let body = verification_body(&digits, self.code_ttl_minutes);
        if let Err(err) = self.mailer.send(identity.email(), subject, &body).await {
            tracing::warn!(
                error = %err,
                email = %identity.email(),
                "verification mail dispatch failed; a resend can recover"
            );
        }
        Ok(())
    }

    async fn mark_verified(&self, identity_id: &IdentityId) -> Result<(), DomainError> {
        let Some(mut identity) = self.identities.find_by_id(identity_id).await? else {
            return Err(DomainError::new(
                ErrorCode::IdentityNotFound,
                "Linked identity no longer exists",
            ));
        };
        identity.mark_verified();
        self.identities.save(&identity).await
    }
}
