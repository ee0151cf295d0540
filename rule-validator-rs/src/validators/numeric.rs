//! Numeric validators
//!
//! The `number` check plus the bound rules (`min`, `max`, `range`), which
//! compare numbers by value and strings/arrays by length.

use super::utils::{
    coerce_number, is_empty_value, is_truthy, measure, number_param, required_number_param,
    Measure,
};
use crate::errors::{CheckResult, ValidationError};
use crate::rule::ParamMap;
use serde_json::Value;

/// Validate that a value coerces to a finite number within optional bounds
pub fn check_number(value: &Value, params: &ParamMap) -> CheckResult {
    let min = number_param(params, "min")?;
    let max = number_param(params, "max")?;

    if is_empty_value(value) {
        return Ok(());
    }

    let number = coerce_number(value)
        .ok_or_else(|| ValidationError::InvalidType(format!("{} is not a number", value)))?;
    if !number.is_finite() {
        return Err(ValidationError::InvalidFormat(format!(
            "{} is not a finite number",
            value
        )));
    }

    if params.get("integer").map(is_truthy).unwrap_or(false) && number.fract() != 0.0 {
        return Err(ValidationError::InvalidFormat(format!(
            "{} is not an integer",
            number
        )));
    }

    if let Some(min) = min {
        if number < min {
            return Err(ValidationError::OutOfRange(format!(
                "{} is less than minimum {}",
                number, min
            )));
        }
    }
    if let Some(max) = max {
        if number > max {
            return Err(ValidationError::OutOfRange(format!(
                "{} exceeds maximum {}",
                number, max
            )));
        }
    }
    Ok(())
}

/// Lower bound on a number's value or a string/array's length
pub fn check_min(value: &Value, params: &ParamMap) -> CheckResult {
    let min = bound_param(params, "min")?;

    match measure(value) {
        Measure::Number(number) if number < min => Err(ValidationError::OutOfRange(format!(
            "{} is less than minimum {}",
            number, min
        ))),
        Measure::Length(actual) if (actual as f64) < min => {
            Err(ValidationError::TooShort { actual, min })
        }
        Measure::Unsupported(kind) => Err(unsupported("min", kind)),
        _ => Ok(()),
    }
}

/// Upper bound on a number's value or a string/array's length
pub fn check_max(value: &Value, params: &ParamMap) -> CheckResult {
    let max = bound_param(params, "max")?;

    match measure(value) {
        Measure::Number(number) if number > max => Err(ValidationError::OutOfRange(format!(
            "{} exceeds maximum {}",
            number, max
        ))),
        Measure::Length(actual) if (actual as f64) > max => {
            Err(ValidationError::TooLong { actual, max })
        }
        Measure::Unsupported(kind) => Err(unsupported("max", kind)),
        _ => Ok(()),
    }
}

/// Inclusive `[min, max]` bound on a number's value or a string/array's length
pub fn check_range(value: &Value, params: &ParamMap) -> CheckResult {
    let min = required_number_param(params, "min", "range")?;
    let max = required_number_param(params, "max", "range")?;
    if min > max {
        return Err(ValidationError::configuration(format!(
            "Range minimum {} is greater than maximum {}",
            min, max
        )));
    }

    let (actual, what) = match measure(value) {
        Measure::Number(number) => (number, "Value"),
        Measure::Length(length) => (length as f64, "Length"),
        Measure::Empty => return Ok(()),
        Measure::Unsupported(kind) => return Err(unsupported("range", kind)),
    };

    if actual < min || actual > max {
        Err(ValidationError::OutOfRange(format!(
            "{} {} is outside range [{}, {}]",
            what, actual, min, max
        )))
    } else {
        Ok(())
    }
}

/// The bound of a `min`/`max` rule: `value`, falling back to the rule's own name
fn bound_param(params: &ParamMap, rule: &str) -> CheckResult<f64> {
    if params.contains_key("value") {
        required_number_param(params, "value", rule)
    } else if params.contains_key(rule) {
        required_number_param(params, rule, rule)
    } else {
        Err(ValidationError::configuration(format!(
            "Parameter 'value' is required for the {} rule",
            rule
        )))
    }
}

fn unsupported(rule: &str, kind: &str) -> ValidationError {
    ValidationError::InvalidType(format!(
        "the {} rule applies to numbers, strings and arrays, not a {}",
        rule, kind
    ))
}
