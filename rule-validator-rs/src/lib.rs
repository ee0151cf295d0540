//! # Rule Validator
//!
//! Evaluates declarative validation rules, as authored by a form designer,
//! against field values and reports every failure in rule order.
//!
//! ## Features
//!
//! - Built-in checks: required, string length, number, email, URL, regex
//!   pattern, min/max/range bounds, date, datetime and enum membership
//! - Async custom validators registered per validator instance
//! - Compiled regex patterns cached per instance
//! - Form-level validation across many fields
//! - Rule failures are always reported, never raised
//!
//! ```no_run
//! use rule_validator_rs::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() {
//! let validator = RuleValidator::new();
//! let rules = RuleSetBuilder::new()
//!     .required()
//!     .number()
//!     .param("max", 100)
//!     .message("must be at most 100")
//!     .build();
//!
//! let result = validator.validate(&json!(150), &rules).await;
//! assert_eq!(result.errors, vec!["must be at most 100".to_string()]);
//! # }
//! ```

mod builder;
mod config;
mod errors;
mod form;
mod registry;
mod rule;
mod validator;
pub mod validators;

pub use builder::RuleSetBuilder;
pub use config::ValidatorConfig;
pub use errors::{CheckResult, ValidationError};
pub use form::{FormRules, FormValidationResult};
pub use registry::{AsyncFnValidator, CustomOutcome, CustomValidator, FnValidator};
pub use rule::{ParamMap, RuleKind, RuleParam, ValidationResult, ValidationRule};
pub use validator::RuleValidator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::builder::RuleSetBuilder;
    pub use crate::config::ValidatorConfig;
    pub use crate::errors::{CheckResult, ValidationError};
    pub use crate::form::{FormRules, FormValidationResult};
    pub use crate::registry::{CustomOutcome, CustomValidator};
    pub use crate::rule::{ParamMap, RuleKind, ValidationResult, ValidationRule};
    pub use crate::validator::RuleValidator;
}

/// Version of the validation library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
