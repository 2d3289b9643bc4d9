//! Verification module - one-time passcodes proving email control.

mod code;

pub use code::{
    generate_code, looks_like_code, CodeCheck, VerificationCode, CODE_LENGTH,
    DEFAULT_CODE_TTL_MINUTES,
};
