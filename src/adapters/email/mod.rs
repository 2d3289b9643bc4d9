//! Mailer adapters.

mod console;
mod resend;

pub use console::ConsoleMailer;
pub use resend::ResendMailer;
