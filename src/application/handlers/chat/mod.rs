//! Chat flow handlers: message processing and code resend.

mod errors;
mod process_message;
mod resend_code;

pub use errors::ChatError;
pub use process_message::{ChatReply, ProcessMessageCommand, ProcessMessageHandler};
pub use resend_code::{ResendCodeCommand, ResendCodeHandler, ResendReply};
