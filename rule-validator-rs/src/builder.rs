//! Rule list builder
//!
//! This module provides a fluent API for assembling an ordered rule list.
//! Modifiers such as [`RuleSetBuilder::message`] apply to the most recently
//! added rule.

use crate::rule::{RuleKind, ValidationRule};
use serde_json::Value;

/// Builder for chaining rules into an ordered list
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    rules: Vec<ValidationRule>,
}

impl RuleSetBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already constructed rule
    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a rule of the given kind with no parameters
    pub fn kind<K: Into<RuleKind>>(self, kind: K) -> Self {
        self.rule(ValidationRule::new(kind))
    }

    pub fn required(self) -> Self {
        self.rule(ValidationRule::required())
    }

    /// String length bounds; either side may be omitted
    pub fn string(self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        let mut rule = ValidationRule::string();
        if let Some(min) = min_length {
            rule = rule.with_param("minLength", min);
        }
        if let Some(max) = max_length {
            rule = rule.with_param("maxLength", max);
        }
        self.rule(rule)
    }

    pub fn number(self) -> Self {
        self.rule(ValidationRule::number())
    }

    pub fn integer(self) -> Self {
        self.rule(ValidationRule::number().with_param("integer", true))
    }

    pub fn email(self) -> Self {
        self.rule(ValidationRule::email())
    }

    pub fn url(self) -> Self {
        self.rule(ValidationRule::url())
    }

    pub fn pattern(self, source: &str) -> Self {
        self.rule(ValidationRule::pattern(source))
    }

    pub fn min<V: Into<Value>>(self, bound: V) -> Self {
        self.rule(ValidationRule::min(bound))
    }

    pub fn max<V: Into<Value>>(self, bound: V) -> Self {
        self.rule(ValidationRule::max(bound))
    }

    pub fn range<A: Into<Value>, B: Into<Value>>(self, min: A, max: B) -> Self {
        self.rule(ValidationRule::range(min, max))
    }

    pub fn date(self) -> Self {
        self.rule(ValidationRule::date())
    }

    pub fn datetime(self) -> Self {
        self.rule(ValidationRule::datetime())
    }

    pub fn one_of<I, V>(self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rule(ValidationRule::one_of(options))
    }

    pub fn custom(self, name: &str) -> Self {
        self.rule(ValidationRule::custom(name))
    }

    /// Add a parameter to the last rule
    pub fn param<V: Into<Value>>(self, key: &str, value: V) -> Self {
        self.map_last(|rule| rule.with_param(key, value))
    }

    /// Set the failure message of the last rule
    pub fn message(self, message: &str) -> Self {
        self.map_last(|rule| rule.with_message(message))
    }

    /// Disable the last rule
    pub fn disabled(self) -> Self {
        self.map_last(ValidationRule::disabled)
    }

    /// Finish building and return the rules in insertion order
    pub fn build(self) -> Vec<ValidationRule> {
        self.rules
    }

    fn map_last<F>(mut self, f: F) -> Self
    where
        F: FnOnce(ValidationRule) -> ValidationRule,
    {
        if let Some(last) = self.rules.pop() {
            self.rules.push(f(last));
        }
        self
    }
}
