//! Rule checks and the helpers they share
//!
//! Every check takes the value under validation and the rule's parameter
//! mapping and returns a [`CheckResult`](crate::errors::CheckResult).

pub mod date;
pub mod generic;
pub mod numeric;
pub mod string;
pub mod url;

pub use date::*;
pub use generic::*;
pub use numeric::*;
pub use string::*;
pub use url::*;

/// Value coercion helpers and the compiled pattern cache
pub mod utils {
    use crate::errors::{CheckResult, ValidationError};
    use crate::rule::ParamMap;
    use dashmap::mapref::entry::Entry;
    use dashmap::DashMap;
    use regex::{Regex, RegexBuilder};
    use serde_json::Value;

    /// Memoizes compiled regexes by their source string.
    ///
    /// A source that fails to compile is never inserted.
    #[derive(Debug)]
    pub struct PatternCache {
        patterns: DashMap<String, Regex>,
        size_limit: usize,
    }

    impl PatternCache {
        pub fn new(size_limit: usize) -> Self {
            Self {
                patterns: DashMap::new(),
                size_limit,
            }
        }

        /// Get the compiled form of `source`, compiling it on first use
        pub fn get_or_compile(&self, source: &str) -> Result<Regex, regex::Error> {
            if let Some(cached) = self.patterns.get(source) {
                return Ok(cached.value().clone());
            }

            match self.patterns.entry(source.to_string()) {
                Entry::Occupied(entry) => Ok(entry.get().clone()),
                Entry::Vacant(entry) => {
                    tracing::trace!(pattern = source, "compiling pattern");
                    let compiled = RegexBuilder::new(source)
                        .size_limit(self.size_limit)
                        .build()?;
                    Ok(entry.insert(compiled).value().clone())
                }
            }
        }

        pub fn len(&self) -> usize {
            self.patterns.len()
        }

        pub fn is_empty(&self) -> bool {
            self.patterns.is_empty()
        }
    }

    /// Null, a blank string or an empty array
    pub fn is_empty_value(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Render a value as the text a pattern or format check sees
    pub fn stringify(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Numbers, numeric strings and booleans coerce; everything else does not
    pub fn coerce_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Value::String(s) => !matches!(s.trim(), "" | "false" | "0"),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Equality with numbers compared by numeric value
    pub fn values_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => x == y,
            },
            _ => a == b,
        }
    }

    /// Optional numeric parameter; present but non-numeric is a configuration error
    pub fn number_param(params: &ParamMap, key: &str) -> CheckResult<Option<f64>> {
        match params.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => match coerce_number(raw) {
                Some(n) if n.is_finite() && !raw.is_boolean() => Ok(Some(n)),
                _ => Err(ValidationError::configuration(format!(
                    "Parameter '{}' must be a number, got {}",
                    key, raw
                ))),
            },
        }
    }

    /// Required numeric parameter
    pub fn required_number_param(params: &ParamMap, key: &str, rule: &str) -> CheckResult<f64> {
        number_param(params, key)?.ok_or_else(|| {
            ValidationError::configuration(format!(
                "Parameter '{}' is required for the {} rule",
                key, rule
            ))
        })
    }

    /// What a bound-style rule compares against
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Measure {
        /// A numeric value
        Number(f64),
        /// Length of a string or array
        Length(usize),
        /// Null; left to the `required` rule
        Empty,
        /// A type the bound rules do not apply to
        Unsupported(&'static str),
    }

    pub fn measure(value: &Value) -> Measure {
        match value {
            Value::Null => Measure::Empty,
            Value::Number(n) => n.as_f64().map(Measure::Number).unwrap_or(Measure::Unsupported("number")),
            Value::String(s) => Measure::Length(s.chars().count()),
            Value::Array(items) => Measure::Length(items.len()),
            Value::Bool(_) => Measure::Unsupported("boolean"),
            Value::Object(_) => Measure::Unsupported("object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use serde_json::{json, Map};

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!("   ")));
        assert!(is_empty_value(&json!([])));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!("x")));
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(3)), Some(3.0));
        assert_eq!(coerce_number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(coerce_number(&json!(true)), Some(1.0));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }

    #[test]
    fn test_values_equal_compares_numbers_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!("1"), &json!(1)));
        assert!(values_equal(&json!({"a": 1}), &json!({"a": 1})));
    }

    #[test]
    fn test_number_param() {
        let mut params = Map::new();
        params.insert("min".into(), json!("4"));
        params.insert("max".into(), json!("lots"));
        assert_eq!(number_param(&params, "min").unwrap(), Some(4.0));
        assert_eq!(number_param(&params, "missing").unwrap(), None);
        assert!(number_param(&params, "max").unwrap_err().is_configuration_error());
        assert!(required_number_param(&params, "missing", "range").is_err());
    }

    #[test]
    fn test_pattern_cache_compiles_once() {
        let cache = PatternCache::new(1 << 20);
        assert!(cache.is_empty());

        let first = cache.get_or_compile("^a+$").unwrap();
        let second = cache.get_or_compile("^a+$").unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_pattern_cache_skips_invalid_sources() {
        let cache = PatternCache::new(1 << 20);
        assert!(cache.get_or_compile("(unclosed").is_err());
        assert!(cache.get_or_compile("(unclosed").is_err());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure(&json!(4)), Measure::Number(4.0));
        assert_eq!(measure(&json!("héllo")), Measure::Length(5));
        assert_eq!(measure(&json!([1, 2])), Measure::Length(2));
        assert_eq!(measure(&json!(null)), Measure::Empty);
        assert_eq!(measure(&json!(true)), Measure::Unsupported("boolean"));
    }
}
