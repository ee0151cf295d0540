//! Error handling for the rule validator
//!
//! Every individual check reports its failure as a [`ValidationError`]. The
//! `Display` output of an error is the generated default message that ends up
//! in [`crate::ValidationResult::errors`] when the rule has no message of its own.

use thiserror::Error;

/// Result type for a single rule check
pub type CheckResult<T = ()> = Result<T, ValidationError>;

/// Enum representing the ways a rule can fail
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is missing or blank
    #[error("This field is required")]
    Required,

    /// Input is shorter than allowed (string, array)
    #[error("Length {actual} is less than minimum length {min}")]
    TooShort { actual: usize, min: f64 },

    /// Input is longer than allowed (string, array)
    #[error("Length {actual} exceeds maximum length {max}")]
    TooLong { actual: usize, max: f64 },

    /// Input is outside a numeric or length range
    #[error("Value is outside allowed range: {0}")]
    OutOfRange(String),

    /// Input type is not supported by the rule
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// Input format is invalid
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Input did not match a regex pattern
    #[error("Value does not match pattern: {0}")]
    PatternMismatch(String),

    /// Input is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Input is not a valid date or is outside the configured bounds
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Input is not one of the allowed options
    #[error("Value {0} is not one of the allowed options")]
    NotAllowed(String),

    /// Rule parameters are missing or malformed
    #[error("Invalid rule configuration: {0}")]
    Configuration(String),

    /// Rule kind is not recognized
    #[error("Unknown rule type: {0}")]
    UnknownRuleType(String),

    /// A registered custom validator is missing or reported an error
    #[error("Custom validator '{name}' failed: {reason}")]
    CustomValidator { name: String, reason: String },

    /// Failure message supplied by a custom validator, shown as-is
    #[error("{0}")]
    Rejected(String),

    /// A rule check failed to run to completion
    #[error("Rule '{rule_type}' failed to execute: {reason}")]
    Execution { rule_type: String, reason: String },
}

impl ValidationError {
    /// Create a configuration error with a message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        ValidationError::Configuration(message.into())
    }

    /// Create a custom validator error
    pub fn custom<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        ValidationError::CustomValidator {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the failure stems from the rule's own setup rather
    /// than from the value being validated
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ValidationError::Configuration(_) | ValidationError::UnknownRuleType(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(ValidationError::Required.to_string(), "This field is required");
        assert_eq!(
            ValidationError::UnknownRuleType("zip".to_string()).to_string(),
            "Unknown rule type: zip"
        );
        assert_eq!(
            ValidationError::TooLong { actual: 7, max: 5.0 }.to_string(),
            "Length 7 exceeds maximum length 5"
        );
        assert_eq!(
            ValidationError::custom("unique", "not registered").to_string(),
            "Custom validator 'unique' failed: not registered"
        );
    }

    #[test]
    fn test_configuration_classification() {
        assert!(ValidationError::configuration("missing min").is_configuration_error());
        assert!(ValidationError::UnknownRuleType("x".into()).is_configuration_error());
        assert!(!ValidationError::Required.is_configuration_error());
        assert!(!ValidationError::PatternMismatch("^a$".into()).is_configuration_error());
    }
}
