//! Date and datetime validators
//!
//! Strings are parsed as RFC 3339 or one of a few common calendar layouts;
//! JSON numbers are read as milliseconds since the Unix epoch.

use super::utils::{is_empty_value, stringify};
use crate::errors::{CheckResult, ValidationError};
use crate::rule::ParamMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a value as a point in time, normalized to UTC
pub fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single().map(|dt| dt.naive_utc())
        }
        Value::String(s) => parse_datetime_str(s.trim()),
        _ => None,
    }
}

/// Parse a value as a calendar date
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    parse_datetime(value).map(|dt| dt.date())
}

fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Validate a calendar date, honoring `minDate`/`maxDate` when they parse
pub fn check_date(value: &Value, params: &ParamMap) -> CheckResult {
    if is_empty_value(value) {
        return Ok(());
    }

    let date = parse_date(value).ok_or_else(|| {
        ValidationError::InvalidDate(format!("'{}' is not a valid date", stringify(value)))
    })?;

    check_bounds(
        date,
        params.get("minDate").and_then(parse_date),
        params.get("maxDate").and_then(parse_date),
    )
}

/// Validate a date and time, honoring `minDateTime`/`maxDateTime` when they parse
pub fn check_datetime(value: &Value, params: &ParamMap) -> CheckResult {
    if is_empty_value(value) {
        return Ok(());
    }

    let datetime = parse_datetime(value).ok_or_else(|| {
        ValidationError::InvalidDate(format!("'{}' is not a valid datetime", stringify(value)))
    })?;

    check_bounds(
        datetime,
        params.get("minDateTime").and_then(parse_datetime),
        params.get("maxDateTime").and_then(parse_datetime),
    )
}

fn check_bounds<T>(actual: T, min: Option<T>, max: Option<T>) -> CheckResult
where
    T: PartialOrd + std::fmt::Display,
{
    if let Some(min) = min {
        if actual < min {
            return Err(ValidationError::InvalidDate(format!(
                "{} is earlier than {}",
                actual, min
            )));
        }
    }
    if let Some(max) = max {
        if actual > max {
            return Err(ValidationError::InvalidDate(format!(
                "{} is later than {}",
                actual, max
            )));
        }
    }
    Ok(())
}
