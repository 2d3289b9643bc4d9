//! ResendCodeHandler - issues a replacement verification code.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::identity::Identity;
use crate::domain::session::Step;
use crate::domain::verification::{generate_code, VerificationCode};
use crate::ports::{IdentityRepository, Mailer, SessionRepository, VerificationStore};

use super::process_message::verification_body;
use super::ChatError;

pub(super) const RESEND_SUBJECT: &str = "StudyGlobal Verification Code (New)";

/// Command to resend a verification code to a session's linked identity.
#[derive(Debug, Clone)]
pub struct ResendCodeCommand {
    pub session_id: String,
}

/// Confirmation returned after a resend.
#[derive(Debug, Clone)]
pub struct ResendReply {
    pub message: String,
    pub session_id: SessionId,
}

/// Handler issuing a new code for a session stuck at the otp step.
///
/// Prior codes are left untouched; any unexpired, unused code for the
/// identity remains valid until consumed or aged out.
pub struct ResendCodeHandler {
    sessions: Arc<dyn SessionRepository>,
    identities: Arc<dyn IdentityRepository>,
    codes: Arc<dyn VerificationStore>,
    mailer: Arc<dyn Mailer>,
    code_ttl_minutes: i64,
}

impl ResendCodeHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        identities: Arc<dyn IdentityRepository>,
        codes: Arc<dyn VerificationStore>,
        mailer: Arc<dyn Mailer>,
        code_ttl_minutes: i64,
    ) -> Self {
        Self {
            sessions,
            identities,
            codes,
            mailer,
            code_ttl_minutes,
        }
    }

    pub async fn handle(&self, cmd: ResendCodeCommand) -> Result<ResendReply, ChatError> {
        let raw = cmd.session_id.trim();
        if raw.is_empty() {
            return Err(ChatError::SessionIdRequired);
        }
        let id = raw
            .parse::<SessionId>()
            .map_err(|_| ChatError::SessionNotFound(raw.to_string()))?;

        let session = self
            .sessions
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ChatError::SessionNotFound(raw.to_string()))?;

        if session.step() != Step::Otp {
            return Err(ChatError::NotAwaitingCode);
        }
        let Some(identity_id) = session.identity_id() else {
            return Err(ChatError::NotAwaitingCode);
        };

        let identity = self
            .identities
            .find_by_id(identity_id)
            .await?
            .ok_or_else(|| {
                ChatError::from(DomainError::new(
                    ErrorCode::IdentityNotFound,
                    "Linked identity no longer exists",
                ))
            })?;

        self.issue_and_send(&identity).await?;

        Ok(ResendReply {
            message: format!(
                "A new verification code has been sent to {}.",
                identity.email()
            ),
            session_id: *session.id(),
        })
    }

    async fn issue_and_send(&self, identity: &Identity) -> Result<(), DomainError> {
        let digits = generate_code(&mut rand::thread_rng());
        let code = VerificationCode::issue(*identity.id(), digits.clone());
        self.codes.store(code).await?;

        let body = verification_body(&digits, self.code_ttl_minutes);
        if let Err(err) = self.mailer.send(identity.email(), RESEND_SUBJECT, &body).await {
            tracing::warn!(
                error = %err,
                email = %identity.email(),
                "resend mail dispatch failed; the user can request another"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::IdentityId;
    use crate::domain::identity::EmailAddress;
    use crate::domain::session::ChatSession;
    use crate::domain::verification::CodeCheck;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockSessionRepository {
        sessions: Mutex<HashMap<SessionId, ChatSession>>,
    }

    impl MockSessionRepository {
        fn new() -> Self {
            Self {
                sessions: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn find_by_id(&self, id: &SessionId) -> Result<Option<ChatSession>, DomainError> {
            Ok(self.sessions.lock().unwrap().get(id).cloned())
        }

        async fn save(&self, session: &ChatSession) -> Result<(), DomainError> {
            self.sessions
                .lock()
                .unwrap()
                .insert(*session.id(), session.clone());
            Ok(())
        }
    }

    struct MockIdentityRepository {
        identities: Mutex<HashMap<IdentityId, Identity>>,
    }

    impl MockIdentityRepository {
        fn new() -> Self {
            Self {
                identities: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl IdentityRepository for MockIdentityRepository {
        async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, DomainError> {
            Ok(self.identities.lock().unwrap().get(id).cloned())
        }

        async fn find_by_email(
            &self,
            email: &EmailAddress,
        ) -> Result<Option<Identity>, DomainError> {
            Ok(self
                .identities
                .lock()
                .unwrap()
                .values()
                .find(|identity| identity.email() == email)
                .cloned())
        }

        async fn save(&self, identity: &Identity) -> Result<(), DomainError> {
            self.identities
                .lock()
                .unwrap()
                .insert(*identity.id(), identity.clone());
            Ok(())
        }
    }

    struct MockVerificationStore {
        stored: Mutex<Vec<VerificationCode>>,
    }

    impl MockVerificationStore {
        fn new() -> Self {
            Self {
                stored: Mutex::new(Vec::new()),
            }
        }

        fn stored_codes(&self) -> Vec<VerificationCode> {
            self.stored.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VerificationStore for MockVerificationStore {
        async fn store(&self, code: VerificationCode) -> Result<(), DomainError> {
            self.stored.lock().unwrap().push(code);
            Ok(())
        }

        async fn validate_and_consume(
            &self,
            _identity_id: &IdentityId,
            _submitted: &str,
        ) -> Result<CodeCheck, DomainError> {
            Ok(CodeCheck::NotFound)
        }
    }

    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent_mail(&self) -> Vec<(String, String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(
            &self,
            to: &EmailAddress,
            subject: &str,
            body: &str,
        ) -> Result<(), DomainError> {
            self.sent.lock().unwrap().push((
                to.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }
    }

    struct Fixture {
        sessions: Arc<MockSessionRepository>,
        identities: Arc<MockIdentityRepository>,
        codes: Arc<MockVerificationStore>,
        mailer: Arc<RecordingMailer>,
        handler: ResendCodeHandler,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(MockSessionRepository::new());
        let identities = Arc::new(MockIdentityRepository::new());
        let codes = Arc::new(MockVerificationStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let handler = ResendCodeHandler::new(
            sessions.clone(),
            identities.clone(),
            codes.clone(),
            mailer.clone(),
            10,
        );
        Fixture {
            sessions,
            identities,
            codes,
            mailer,
            handler,
        }
    }

    async fn otp_session(fixture: &Fixture) -> ChatSession {
        let email = EmailAddress::parse("jo@x.com").unwrap();
        let identity = Identity::new(email, "Jo");
        fixture.identities.save(&identity).await.unwrap();

        let mut session = ChatSession::new();
        session.apply(Step::Otp, vec![]);
        session.link_identity(*identity.id()).unwrap();
        fixture.sessions.save(&session).await.unwrap();
        session
    }

    #[tokio::test]
    async fn resends_with_new_code_subject() {
        let fixture = fixture();
        let session = otp_session(&fixture).await;

        let reply = fixture
            .handler
            .handle(ResendCodeCommand {
                session_id: session.id().to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            reply.message,
            "A new verification code has been sent to jo@x.com."
        );
        let sent = fixture.mailer.sent_mail();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "StudyGlobal Verification Code (New)");
        let code = fixture.codes.stored_codes()[0].code().to_string();
        assert!(sent[0].2.contains(&code));
    }

    #[tokio::test]
    async fn stores_a_fresh_code() {
        let fixture = fixture();
        let session = otp_session(&fixture).await;

        fixture
            .handler
            .handle(ResendCodeCommand {
                session_id: session.id().to_string(),
            })
            .await
            .unwrap();

        assert_eq!(fixture.codes.stored_codes().len(), 1);
    }

    #[tokio::test]
    async fn blank_session_id_is_rejected() {
        let fixture = fixture();
        let result = fixture
            .handler
            .handle(ResendCodeCommand {
                session_id: "   ".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ChatError::SessionIdRequired)));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let fixture = fixture();
        let result = fixture
            .handler
            .handle(ResendCodeCommand {
                session_id: SessionId::new().to_string(),
            })
            .await;
        assert!(matches!(result, Err(ChatError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn malformed_session_id_is_not_found() {
        let fixture = fixture();
        let result = fixture
            .handler
            .handle(ResendCodeCommand {
                session_id: "not-a-uuid".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ChatError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn session_not_at_otp_step_is_rejected() {
        let fixture = fixture();
        let session = ChatSession::new();
        fixture.sessions.save(&session).await.unwrap();

        let result = fixture
            .handler
            .handle(ResendCodeCommand {
                session_id: session.id().to_string(),
            })
            .await;
        assert!(matches!(result, Err(ChatError::NotAwaitingCode)));
        assert!(fixture.mailer.sent_mail().is_empty());
    }

    #[tokio::test]
    async fn otp_session_without_identity_is_rejected() {
        let fixture = fixture();
        let mut session = ChatSession::new();
        session.apply(Step::Otp, vec![]);
        fixture.sessions.save(&session).await.unwrap();

        let result = fixture
            .handler
            .handle(ResendCodeCommand {
                session_id: session.id().to_string(),
            })
            .await;
        assert!(matches!(result, Err(ChatError::NotAwaitingCode)));
    }
}
