//! Conversation module - the step-transition engine.
//!
//! The engine is a pure function over (step, data bag, message). Side
//! effects it needs (issuing a code, checking a submitted code) are
//! requested through [`Transition`] variants and performed by the
//! application layer.

mod engine;
mod redirect;

pub use engine::{ConversationEngine, EngineOutput, Transition};
pub use redirect::Redirect;
