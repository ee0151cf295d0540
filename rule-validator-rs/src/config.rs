//! Validator configuration
//!
//! Defaults can be overridden from the environment (or a `.env` file) with
//! the `RULE_VALIDATOR_*` variables.

use std::env;
use std::str::FromStr;

/// Default maximum length of a `pattern` rule's regex source
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 1024;

/// Default size limit for a compiled regex program (1 MiB)
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// Environment variable overriding [`ValidatorConfig::max_pattern_length`]
pub const ENV_MAX_PATTERN_LENGTH: &str = "RULE_VALIDATOR_MAX_PATTERN_LENGTH";

/// Environment variable overriding [`ValidatorConfig::regex_size_limit`]
pub const ENV_REGEX_SIZE_LIMIT: &str = "RULE_VALIDATOR_REGEX_SIZE_LIMIT";

/// Environment variable overriding [`ValidatorConfig::log_failures`]
pub const ENV_LOG_FAILURES: &str = "RULE_VALIDATOR_LOG_FAILURES";

/// Configuration for a [`crate::RuleValidator`]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Longest regex source a `pattern` rule may use
    pub max_pattern_length: usize,
    /// Size limit handed to the regex compiler
    pub regex_size_limit: usize,
    /// Log every failed rule at debug level
    pub log_failures: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            log_failures: true,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// when one is present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_pattern_length: parse_or(&lookup, ENV_MAX_PATTERN_LENGTH, defaults.max_pattern_length),
            regex_size_limit: parse_or(&lookup, ENV_REGEX_SIZE_LIMIT, defaults.regex_size_limit),
            log_failures: lookup(ENV_LOG_FAILURES)
                .map(|raw| match parse_bool(&raw) {
                    Some(flag) => flag,
                    None => {
                        tracing::warn!(
                            "Invalid boolean in {}: {:?}, using default {}",
                            ENV_LOG_FAILURES,
                            raw,
                            defaults.log_failures
                        );
                        defaults.log_failures
                    }
                })
                .unwrap_or(defaults.log_failures),
        }
    }

    /// Set the maximum pattern length
    pub fn with_max_pattern_length(mut self, max: usize) -> Self {
        self.max_pattern_length = max;
        self
    }

    /// Set the compiled regex size limit
    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    /// Enable or disable failure logging
    pub fn with_log_failures(mut self, enabled: bool) -> Self {
        self.log_failures = enabled;
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("Invalid value in {}: {:?}, using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
