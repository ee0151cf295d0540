//! Generic validators
//!
//! Checks that apply to any value type: presence and membership.

use super::utils::{is_empty_value, values_equal};
use crate::errors::{CheckResult, ValidationError};
use crate::rule::ParamMap;
use serde_json::Value;

/// Validate that a value is present: not null, not blank, not an empty array
pub fn check_required(value: &Value) -> CheckResult {
    if is_empty_value(value) {
        Err(ValidationError::Required)
    } else {
        Ok(())
    }
}

/// Validate that a value is one of the `options` parameter's entries
pub fn check_enum(value: &Value, params: &ParamMap) -> CheckResult {
    let options = match params.get("options") {
        Some(Value::Array(options)) => options,
        Some(other) => {
            return Err(ValidationError::configuration(format!(
                "Parameter 'options' must be an array, got {}",
                other
            )))
        }
        None => {
            return Err(ValidationError::configuration(
                "Parameter 'options' is required for the enum rule",
            ))
        }
    };

    if options.iter().any(|option| values_equal(option, value)) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use test_case::test_case;

    fn options(options: Value) -> ParamMap {
        let mut params = Map::new();
        params.insert("options".into(), options);
        params
    }

    #[test_case(json!(null) => false; "null")]
    #[test_case(json!("") => false; "empty string")]
    #[test_case(json!("  \t") => false; "whitespace")]
    #[test_case(json!([]) => false; "empty array")]
    #[test_case(json!("x") => true; "text")]
    #[test_case(json!(0) => true; "zero")]
    #[test_case(json!(false) => true; "false")]
    #[test_case(json!([0]) => true; "non-empty array")]
    fn test_required(value: Value) -> bool {
        check_required(&value).is_ok()
    }

    #[test]
    fn test_enum_membership() {
        let params = options(json!(["ipv4", "ipv6", 4]));
        assert!(check_enum(&json!("ipv4"), &params).is_ok());
        assert!(check_enum(&json!(4.0), &params).is_ok());
        assert_eq!(
            check_enum(&json!("ipx"), &params),
            Err(ValidationError::NotAllowed("\"ipx\"".to_string()))
        );
        assert!(check_enum(&json!("4"), &params).is_err());
    }

    #[test]
    fn test_enum_misconfiguration() {
        let err = check_enum(&json!("a"), &options(json!("a,b"))).unwrap_err();
        assert!(err.is_configuration_error());

        let err = check_enum(&json!("a"), &Map::new()).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
