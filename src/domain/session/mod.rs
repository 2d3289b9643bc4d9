//! Session module - per-conversation state.
//!
//! A chat session holds everything the engine needs to continue a
//! conversation: the current step and the accumulated data bag. No hidden
//! state lives anywhere else.

mod chat_session;
mod data_bag;
mod step;

pub use chat_session::ChatSession;
pub use data_bag::{DataBag, DataKey};
pub use step::Step;
