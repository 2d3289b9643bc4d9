//! Domain layer - aggregates, value objects, and the conversation engine.

pub mod conversation;
pub mod foundation;
pub mod identity;
pub mod session;
pub mod verification;
