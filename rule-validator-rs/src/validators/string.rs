//! String validators
//!
//! Length bounds, email format and regex patterns.

use super::utils::{is_empty_value, number_param, stringify, PatternCache};
use crate::errors::{CheckResult, ValidationError};
use crate::rule::ParamMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Single `@`, no whitespace, at least one dot in the domain
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Validate `minLength`/`maxLength` bounds on the value's text
pub fn check_string(value: &Value, params: &ParamMap) -> CheckResult {
    let min = number_param(params, "minLength")?;
    let max = number_param(params, "maxLength")?;

    if value.is_null() {
        return Ok(());
    }

    let actual = stringify(value).chars().count();
    if let Some(min) = min {
        if (actual as f64) < min {
            return Err(ValidationError::TooShort { actual, min });
        }
    }
    if let Some(max) = max {
        if (actual as f64) > max {
            return Err(ValidationError::TooLong { actual, max });
        }
    }
    Ok(())
}

/// Validate email address format
pub fn check_email(value: &Value) -> CheckResult {
    if is_empty_value(value) {
        return Ok(());
    }

    let text = stringify(value);
    if EMAIL_REGEX.is_match(&text) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat(format!(
            "'{}' is not a valid email address",
            text
        )))
    }
}

/// Validate that the value's text matches the `pattern` parameter.
///
/// Unlike the other format checks there is no empty-value pass: `null` is
/// tested as `""`, so an optional field needs a pattern that accepts the
/// empty string (for example `^(\d+)?$`).
pub fn check_pattern(
    value: &Value,
    params: &ParamMap,
    cache: &PatternCache,
    max_pattern_length: usize,
) -> CheckResult {
    let source = match params.get("pattern") {
        Some(Value::String(source)) => source.as_str(),
        None | Some(Value::Null) => "",
        Some(other) => {
            return Err(ValidationError::configuration(format!(
                "Parameter 'pattern' must be a string, got {}",
                other
            )))
        }
    };

    if source.is_empty() {
        return Err(ValidationError::configuration(
            "Parameter 'pattern' is required for the pattern rule",
        ));
    }
    if source.chars().count() > max_pattern_length {
        return Err(ValidationError::configuration(format!(
            "Pattern exceeds maximum length of {} characters",
            max_pattern_length
        )));
    }

    let regex = cache
        .get_or_compile(source)
        .map_err(|e| ValidationError::configuration(format!("Invalid regex pattern: {}", e)))?;

    if regex.is_match(&stringify(value)) {
        Ok(())
    } else {
        Err(ValidationError::PatternMismatch(source.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use test_case::test_case;

    fn params(pairs: &[(&str, Value)]) -> ParamMap {
        let mut map = Map::new();
        for (key, value) in pairs {
            map.insert(key.to_string(), value.clone());
        }
        map
    }

    #[test]
    fn test_string_length_bounds() {
        let bounds = params(&[("minLength", json!(2)), ("maxLength", json!(4))]);
        assert!(check_string(&json!("abc"), &bounds).is_ok());
        assert_eq!(
            check_string(&json!("a"), &bounds),
            Err(ValidationError::TooShort { actual: 1, min: 2.0 })
        );
        assert_eq!(
            check_string(&json!("abcde"), &bounds),
            Err(ValidationError::TooLong { actual: 5, max: 4.0 })
        );
        // counted in characters, not bytes
        assert!(check_string(&json!("日本語"), &bounds).is_ok());
    }

    #[test]
    fn test_string_null_and_unbounded() {
        let bounds = params(&[("minLength", json!(2))]);
        assert!(check_string(&json!(null), &bounds).is_ok());
        assert!(check_string(&json!("anything"), &Map::new()).is_ok());
        assert!(check_string(&json!("x"), &params(&[("maxLength", json!("ten"))]))
            .unwrap_err()
            .is_configuration_error());
    }

    #[test_case("a@b.co" => true; "simple")]
    #[test_case("first.last+tag@sub.example.org" => true; "dotted local part")]
    #[test_case("" => true; "empty")]
    #[test_case("not-an-email" => false; "no at")]
    #[test_case("a@b" => false; "undotted domain")]
    #[test_case("a@@b.co" => false; "double at")]
    #[test_case("a b@c.de" => false; "whitespace")]
    fn test_email(input: &str) -> bool {
        check_email(&json!(input)).is_ok()
    }

    #[test]
    fn test_pattern_matches_and_caches() {
        let cache = PatternCache::new(1 << 20);
        let rule = params(&[("pattern", json!(r"^\d{3}$"))]);

        assert!(check_pattern(&json!("123"), &rule, &cache, 1024).is_ok());
        assert!(check_pattern(&json!(456), &rule, &cache, 1024).is_ok());
        assert_eq!(
            check_pattern(&json!("12a"), &rule, &cache, 1024),
            Err(ValidationError::PatternMismatch(r"^\d{3}$".to_string()))
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_pattern_tests_empty_values() {
        let cache = PatternCache::new(1 << 20);
        let digits = params(&[("pattern", json!(r"^\d+$"))]);
        assert_eq!(
            check_pattern(&json!(null), &digits, &cache, 1024),
            Err(ValidationError::PatternMismatch(r"^\d+$".to_string()))
        );

        let optional_digits = params(&[("pattern", json!(r"^(\d+)?$"))]);
        assert!(check_pattern(&json!(null), &optional_digits, &cache, 1024).is_ok());
        assert!(check_pattern(&json!(""), &optional_digits, &cache, 1024).is_ok());
    }

    #[test]
    fn test_pattern_misconfiguration() {
        let cache = PatternCache::new(1 << 20);

        let empty = check_pattern(&json!("x"), &params(&[("pattern", json!(""))]), &cache, 1024);
        assert!(empty.unwrap_err().is_configuration_error());

        let missing = check_pattern(&json!("x"), &Map::new(), &cache, 1024);
        assert!(missing.unwrap_err().is_configuration_error());

        let invalid = check_pattern(&json!("x"), &params(&[("pattern", json!("[a-"))]), &cache, 1024);
        assert!(invalid.unwrap_err().to_string().contains("Invalid regex pattern"));
        assert!(cache.is_empty());

        let too_long = check_pattern(&json!("x"), &params(&[("pattern", json!("a{2}"))]), &cache, 3);
        assert!(too_long.unwrap_err().is_configuration_error());
    }
}
