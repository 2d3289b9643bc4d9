//! Outbound and inbound adapters.

pub mod email;
pub mod http;
pub mod memory;
