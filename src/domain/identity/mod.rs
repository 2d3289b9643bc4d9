//! Identity module - the user record keyed by email.
//!
//! An identity is created the first time an email address is seen during
//! the intake flow and flips to verified only through code consumption.

mod email;
#[allow(clippy::module_inception)]
mod identity;

pub use email::EmailAddress;
pub use identity::{Identity, FALLBACK_DISPLAY_NAME};
