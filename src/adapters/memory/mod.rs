//! In-memory store adapters.
//!
//! The service's chosen persistence posture: sessions, identities, and
//! codes live in process memory, keyed maps behind locks. Durable enough
//! to survive between HTTP requests; retention beyond process lifetime is
//! out of scope.

mod identity_repository;
mod session_repository;
mod verification_store;

pub use identity_repository::InMemoryIdentityRepository;
pub use session_repository::InMemorySessionRepository;
pub use verification_store::InMemoryVerificationStore;
