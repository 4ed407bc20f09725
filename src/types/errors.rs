//! # Type Registry Errors
//!
//! Validation failures are not errors: a rejected value is reported as a
//! [`Verdict`](super::Verdict). Errors here are caller mistakes
//! (unknown names, bad validator parameters) and client-input faults.

use thiserror::Error;

/// Result type for registry operations
pub type TypeResult<T> = Result<T, TypeError>;

/// Type registry errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// Type name is not in the registry
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Validator name is not declared for the type
    #[error("Unknown validator '{validator}' for type '{type_name}'")]
    UnknownValidator {
        type_name: String,
        validator: String,
    },

    /// Validator name is not in the closed validator set
    #[error("Unknown validator: {0}")]
    UnknownValidatorName(String),

    /// Validator parameter failed its own parameter check
    #[error("Invalid parameter for validator '{validator}': {reason}")]
    InvalidParam { validator: String, reason: String },

    /// Time zone name is not in the IANA database
    #[error("Not a valid timezone: {0}")]
    InvalidTimezone(String),

    /// Registry configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TypeError {
    /// Creates an invalid parameter error
    pub fn invalid_param(validator: impl Into<String>, reason: impl Into<String>) -> Self {
        TypeError::InvalidParam {
            validator: validator.into(),
            reason: reason.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::UnknownType(_) => "UNKNOWN_TYPE",
            TypeError::UnknownValidator { .. } | TypeError::UnknownValidatorName(_) => {
                "UNKNOWN_VALIDATOR"
            }
            TypeError::InvalidParam { .. } => "INVALID_VALIDATOR_PARAM",
            TypeError::InvalidTimezone(_) => "INVALID_TIMEZONE",
            TypeError::Config(_) => "INVALID_CONFIG",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            TypeError::UnknownType(_) => 404,
            TypeError::UnknownValidator { .. } | TypeError::UnknownValidatorName(_) => 404,
            TypeError::InvalidParam { .. } => 400,
            TypeError::InvalidTimezone(_) => 400,
            TypeError::Config(_) => 500,
        }
    }

    /// Returns true when the fault lies with the supplied input
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
