//! Ports - contracts between the application layer and the outside world.
//!
//! Adapters implement these traits; handlers depend only on the traits.

mod identity_repository;
mod mailer;
mod session_repository;
mod verification_store;

pub use identity_repository::IdentityRepository;
pub use mailer::Mailer;
pub use session_repository::SessionRepository;
pub use verification_store::VerificationStore;
