//! Rule and result data model
//!
//! Rules are plain serde records so that rule lists authored as JSON by a
//! form designer deserialize directly into [`ValidationRule`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Parameter mapping handed to checks and custom validators
pub type ParamMap = Map<String, Value>;

/// The closed set of rule kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleKind {
    Required,
    String,
    Number,
    Email,
    Url,
    Pattern,
    Min,
    Max,
    Range,
    Date,
    DateTime,
    Enum,
    Custom,
    /// Any kind name this crate does not recognize
    Unknown(String),
}

impl RuleKind {
    /// The wire name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            RuleKind::Required => "required",
            RuleKind::String => "string",
            RuleKind::Number => "number",
            RuleKind::Email => "email",
            RuleKind::Url => "url",
            RuleKind::Pattern => "pattern",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Range => "range",
            RuleKind::Date => "date",
            RuleKind::DateTime => "datetime",
            RuleKind::Enum => "enum",
            RuleKind::Custom => "custom",
            RuleKind::Unknown(name) => name,
        }
    }
}

impl From<&str> for RuleKind {
    fn from(name: &str) -> Self {
        match name {
            "required" => RuleKind::Required,
            "string" => RuleKind::String,
            "number" => RuleKind::Number,
            "email" => RuleKind::Email,
            "url" => RuleKind::Url,
            "pattern" => RuleKind::Pattern,
            "min" => RuleKind::Min,
            "max" => RuleKind::Max,
            "range" => RuleKind::Range,
            "date" => RuleKind::Date,
            "datetime" => RuleKind::DateTime,
            "enum" => RuleKind::Enum,
            "custom" => RuleKind::Custom,
            other => RuleKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for RuleKind {
    fn from(name: String) -> Self {
        RuleKind::from(name.as_str())
    }
}

impl From<RuleKind> for String {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{key, value}` entry of a rule's parameter list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleParam {
    pub key: String,
    pub value: Value,
}

impl RuleParam {
    pub fn new<K: Into<String>, V: Into<Value>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

// Explicit JSON nulls read as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_enabled))
}

/// A single constraint applied to a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    /// Which check to run
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Ordered parameter list
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Vec<RuleParam>,
    /// Message shown on failure, overriding the generated one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Disabled rules are skipped entirely
    #[serde(default = "default_enabled", deserialize_with = "null_as_enabled")]
    pub enabled: bool,
    /// Registry name looked up for `custom` rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_validator: Option<String>,
}

impl ValidationRule {
    /// Create an enabled rule of the given kind with no parameters
    pub fn new<K: Into<RuleKind>>(kind: K) -> Self {
        Self {
            kind: kind.into(),
            params: Vec::new(),
            message: None,
            enabled: true,
            custom_validator: None,
        }
    }

    pub fn required() -> Self {
        Self::new(RuleKind::Required)
    }

    pub fn string() -> Self {
        Self::new(RuleKind::String)
    }

    pub fn number() -> Self {
        Self::new(RuleKind::Number)
    }

    pub fn email() -> Self {
        Self::new(RuleKind::Email)
    }

    pub fn url() -> Self {
        Self::new(RuleKind::Url)
    }

    /// `pattern` rule; empty values are matched against the pattern too, so
    /// an optional field needs a pattern that accepts `""`
    pub fn pattern<S: Into<String>>(source: S) -> Self {
        Self::new(RuleKind::Pattern).with_param("pattern", source.into())
    }

    pub fn min<V: Into<Value>>(bound: V) -> Self {
        Self::new(RuleKind::Min).with_param("value", bound)
    }

    pub fn max<V: Into<Value>>(bound: V) -> Self {
        Self::new(RuleKind::Max).with_param("value", bound)
    }

    pub fn range<A: Into<Value>, B: Into<Value>>(min: A, max: B) -> Self {
        Self::new(RuleKind::Range)
            .with_param("min", min)
            .with_param("max", max)
    }

    pub fn date() -> Self {
        Self::new(RuleKind::Date)
    }

    pub fn datetime() -> Self {
        Self::new(RuleKind::DateTime)
    }

    /// `enum` rule accepting any of the given options
    pub fn one_of<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let options: Vec<Value> = options.into_iter().map(Into::into).collect();
        Self::new(RuleKind::Enum).with_param("options", Value::Array(options))
    }

    pub fn custom<S: Into<String>>(name: S) -> Self {
        Self::new(RuleKind::Custom).with_custom_validator(name)
    }

    /// Append a parameter
    pub fn with_param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.params.push(RuleParam::new(key, value));
        self
    }

    /// Set the failure message
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the custom validator name
    pub fn with_custom_validator<S: Into<String>>(mut self, name: S) -> Self {
        self.custom_validator = Some(name.into());
        self
    }

    /// Mark the rule as disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Collapse the parameter list into a mapping; later duplicates win
    pub fn params_map(&self) -> ParamMap {
        let mut map = ParamMap::new();
        for param in &self.params {
            map.insert(param.key.clone(), param.value.clone());
        }
        map
    }

    /// The configured message, if present and non-empty
    pub fn configured_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Outcome of evaluating a rule list against one value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff no rule failed
    pub valid: bool,
    /// One message per failed rule, in rule order
    pub errors: Vec<String>,
    /// The failed rules, in rule order
    pub failed_rules: Vec<ValidationRule>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl ValidationResult {
    /// A passing result with no errors
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            failed_rules: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The message of the first failed rule
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    /// Convert into a plain `Result` carrying the error messages
    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    pub(crate) fn record_failure(&mut self, rule: &ValidationRule, message: String) {
        self.valid = false;
        self.errors.push(message);
        self.failed_rules.push(rule.clone());
    }
}
