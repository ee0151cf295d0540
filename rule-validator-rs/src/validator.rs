//! The rule evaluation engine

use crate::config::ValidatorConfig;
use crate::errors::{CheckResult, ValidationError};
use crate::registry::{AsyncFnValidator, CustomOutcome, CustomValidator, CustomValidatorRegistry, FnValidator};
use crate::rule::{ParamMap, RuleKind, ValidationResult, ValidationRule};
use crate::validators::utils::PatternCache;
use crate::validators::{
    check_date, check_datetime, check_email, check_enum, check_max, check_min, check_number,
    check_pattern, check_range, check_required, check_string, check_url,
};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Evaluates ordered rule lists against values.
///
/// Each instance owns its custom validator registry and its compiled pattern
/// cache; registrations on one instance are invisible to another.
#[derive(Debug)]
pub struct RuleValidator {
    config: ValidatorConfig,
    registry: CustomValidatorRegistry,
    patterns: PatternCache,
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleValidator {
    /// Create a validator with the default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            patterns: PatternCache::new(config.regex_size_limit),
            registry: CustomValidatorRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Register (or silently replace) the validator used by `custom` rules naming `name`
    pub fn register_custom_validator<V>(&self, name: &str, validator: V) -> CheckResult<()>
    where
        V: CustomValidator + 'static,
    {
        self.registry.register(name, Arc::new(validator))
    }

    /// Register a synchronous closure as a custom validator
    pub fn register_fn<F>(&self, name: &str, f: F) -> CheckResult<()>
    where
        F: Fn(&Value, &ParamMap) -> CustomOutcome + Send + Sync + 'static,
    {
        self.register_custom_validator(name, FnValidator(f))
    }

    /// Register a closure returning a future as a custom validator
    pub fn register_async_fn<F, Fut>(&self, name: &str, f: F) -> CheckResult<()>
    where
        F: Fn(Value, ParamMap) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CustomOutcome> + Send + 'static,
    {
        self.register_custom_validator(name, AsyncFnValidator(f))
    }

    pub fn has_custom_validator(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Names of all registered custom validators, sorted
    pub fn custom_validator_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Number of distinct pattern sources compiled so far
    pub fn cached_pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Evaluate every enabled rule against `value`, in order.
    ///
    /// Rule problems of any kind (failed checks, bad parameters, unknown
    /// kinds, custom validator errors or panics) are reported in the result;
    /// evaluation always continues with the next rule.
    pub async fn validate(&self, value: &Value, rules: &[ValidationRule]) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if rules.is_empty() {
            return result;
        }

        for (index, rule) in rules.iter().enumerate() {
            if !rule.enabled {
                tracing::trace!(rule = %rule.kind, index, "skipping disabled rule");
                continue;
            }

            let outcome = AssertUnwindSafe(self.check_rule(value, rule))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    let reason = panic_reason(panic.as_ref());
                    tracing::warn!(
                        rule = %rule.kind,
                        index,
                        validator = rule.custom_validator.as_deref().unwrap_or(""),
                        reason = %reason,
                        "rule panicked during evaluation"
                    );
                    Err(ValidationError::Execution {
                        rule_type: rule.kind.to_string(),
                        reason,
                    })
                });

            if let Err(error) = outcome {
                if self.config.log_failures {
                    tracing::debug!(rule = %rule.kind, index, error = %error, "rule failed");
                }
                let message = rule
                    .configured_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                result.record_failure(rule, message);
            }
        }

        result
    }

    async fn check_rule(&self, value: &Value, rule: &ValidationRule) -> CheckResult {
        let params = rule.params_map();
        match &rule.kind {
            RuleKind::Required => check_required(value),
            RuleKind::String => check_string(value, &params),
            RuleKind::Number => check_number(value, &params),
            RuleKind::Email => check_email(value),
            RuleKind::Url => check_url(value),
            RuleKind::Pattern => check_pattern(
                value,
                &params,
                &self.patterns,
                self.config.max_pattern_length,
            ),
            RuleKind::Min => check_min(value, &params),
            RuleKind::Max => check_max(value, &params),
            RuleKind::Range => check_range(value, &params),
            RuleKind::Date => check_date(value, &params),
            RuleKind::DateTime => check_datetime(value, &params),
            RuleKind::Enum => check_enum(value, &params),
            RuleKind::Custom => self.check_custom(value, rule, &params).await,
            RuleKind::Unknown(name) => Err(ValidationError::UnknownRuleType(name.clone())),
        }
    }

    async fn check_custom(&self, value: &Value, rule: &ValidationRule, params: &ParamMap) -> CheckResult {
        let name = rule
            .custom_validator
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ValidationError::configuration("Custom rule does not name a custom validator")
            })?;

        let validator = self
            .registry
            .get(name)
            .ok_or_else(|| ValidationError::custom(name, "no validator is registered under this name"))?;

        match validator.validate(value, params).await {
            Ok(None) => Ok(()),
            Ok(Some(message)) if message.is_empty() => Ok(()),
            Ok(Some(message)) => Err(ValidationError::Rejected(message)),
            Err(error) => {
                tracing::warn!(validator = name, error = %error, "custom validator returned an error");
                Err(ValidationError::custom(name, error.to_string()))
            }
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}
