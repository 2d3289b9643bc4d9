//! Verification flow configuration

use serde::Deserialize;

use crate::domain::verification::DEFAULT_CODE_TTL_MINUTES;

use super::error::ValidationError;

/// Verification sub-flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Minutes an issued code stays valid
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: i64,

    /// Base path for the course-recommendation redirect
    #[serde(default = "default_courses_path")]
    pub courses_path: String,
}

impl VerificationConfig {
    /// Validate verification configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code_ttl_minutes <= 0 {
            return Err(ValidationError::InvalidCodeTtl);
        }
        if !self.courses_path.starts_with('/') {
            return Err(ValidationError::InvalidCoursesPath);
        }
        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: default_code_ttl_minutes(),
            courses_path: default_courses_path(),
        }
    }
}

fn default_code_ttl_minutes() -> i64 {
    DEFAULT_CODE_TTL_MINUTES
}

fn default_courses_path() -> String {
    "/courses".to_string()
}
