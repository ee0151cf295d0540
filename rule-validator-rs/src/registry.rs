//! Custom validator registry
//!
//! `custom` rules name a validator registered on the [`RuleValidator`](crate::RuleValidator)
//! instance. A validator returns `Ok(None)` to pass, `Ok(Some(message))` to
//! fail, and `Err(_)` when it could not run at all.

use crate::errors::{CheckResult, ValidationError};
use crate::rule::ParamMap;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Outcome of a custom validator: `None` passes, `Some` carries the failure message
pub type CustomOutcome = anyhow::Result<Option<String>>;

/// A caller-supplied check invoked for `custom` rules
#[async_trait]
pub trait CustomValidator: Send + Sync {
    async fn validate(&self, value: &Value, params: &ParamMap) -> CustomOutcome;
}

/// Adapter for a synchronous closure
pub struct FnValidator<F>(pub F);

#[async_trait]
impl<F> CustomValidator for FnValidator<F>
where
    F: Fn(&Value, &ParamMap) -> CustomOutcome + Send + Sync,
{
    async fn validate(&self, value: &Value, params: &ParamMap) -> CustomOutcome {
        (self.0)(value, params)
    }
}

/// Adapter for a closure returning a future.
///
/// The closure receives owned copies of the value and parameters so the
/// returned future does not borrow from the caller.
pub struct AsyncFnValidator<F>(pub F);

#[async_trait]
impl<F, Fut> CustomValidator for AsyncFnValidator<F>
where
    F: Fn(Value, ParamMap) -> Fut + Send + Sync,
    Fut: Future<Output = CustomOutcome> + Send + 'static,
{
    async fn validate(&self, value: &Value, params: &ParamMap) -> CustomOutcome {
        (self.0)(value.clone(), params.clone()).await
    }
}

/// Name to validator mapping owned by one validator instance
#[derive(Default)]
pub struct CustomValidatorRegistry {
    validators: DashMap<String, Arc<dyn CustomValidator>>,
}

impl CustomValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the validator registered under `name`
    pub fn register(&self, name: &str, validator: Arc<dyn CustomValidator>) -> CheckResult<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::configuration(
                "Custom validator name must not be empty",
            ));
        }

        if self.validators.insert(name.to_string(), validator).is_some() {
            tracing::info!(validator = name, "replaced custom validator registration");
        } else {
            tracing::debug!(validator = name, "registered custom validator");
        }
        Ok(())
    }

    /// Look up a validator; the returned handle does not hold the map's lock
    pub fn get(&self, name: &str) -> Option<Arc<dyn CustomValidator>> {
        self.validators.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.validators.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for CustomValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn always(message: Option<&'static str>) -> Arc<dyn CustomValidator> {
        Arc::new(FnValidator(move |_: &Value, _: &ParamMap| -> CustomOutcome {
            Ok(message.map(str::to_string))
        }))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = CustomValidatorRegistry::new();
        assert!(registry.is_empty());

        registry.register("unique", always(None)).unwrap();
        registry.register("banned", always(Some("no"))).unwrap();

        assert!(registry.contains("unique"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["banned".to_string(), "unique".to_string()]);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let registry = CustomValidatorRegistry::new();
        let err = registry.register("  ", always(None)).unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn test_reregistration_replaces() {
        let registry = CustomValidatorRegistry::new();
        registry.register("check", always(Some("first"))).unwrap();
        registry.register("check", always(Some("second"))).unwrap();

        assert_eq!(registry.len(), 1);
        let validator = registry.get("check").unwrap();
        let outcome = validator.validate(&json!(1), &ParamMap::new()).await.unwrap();
        assert_eq!(outcome.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_async_adapter_receives_params() {
        let validator = AsyncFnValidator(|value: Value, params: ParamMap| async move {
            let limit = params.get("limit").and_then(Value::as_i64).unwrap_or(0);
            let outcome: CustomOutcome = if value.as_i64().unwrap_or(0) > limit {
                Ok(Some(format!("over {}", limit)))
            } else {
                Ok(None)
            };
            outcome
        });

        let mut params = ParamMap::new();
        params.insert("limit".into(), json!(3));
        assert_eq!(validator.validate(&json!(2), &params).await.unwrap(), None);
        assert_eq!(
            validator.validate(&json!(5), &params).await.unwrap().as_deref(),
            Some("over 3")
        );
    }
}
