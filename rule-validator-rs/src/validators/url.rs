//! URL validators

use super::utils::{is_empty_value, stringify};
use crate::errors::{CheckResult, ValidationError};
use serde_json::Value;
use url::Url;

/// Validate that the value parses as an absolute URL
pub fn check_url(value: &Value) -> CheckResult {
    if is_empty_value(value) {
        return Ok(());
    }

    let text = stringify(value);
    match Url::parse(text.trim()) {
        Ok(_) => Ok(()),
        Err(e) => Err(ValidationError::InvalidUrl(format!("'{}': {}", text, e))),
    }
}
