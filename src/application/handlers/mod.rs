//! Command handlers.

pub mod chat;

pub use chat::{
    ChatError, ChatReply, ProcessMessageCommand, ProcessMessageHandler, ResendCodeCommand,
    ResendCodeHandler, ResendReply,
};
