//! Form-level validation
//!
//! Applies a rule list per field to a JSON object of submitted values. Fields
//! are validated one after another in the order they were added.

use crate::rule::{ValidationResult, ValidationRule};
use crate::validator::RuleValidator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static ABSENT: Value = Value::Null;

/// Ordered mapping from field name to its rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormRules {
    fields: Vec<(String, Vec<ValidationRule>)>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rules for a field, replacing any earlier rules for it
    pub fn field<S: Into<String>>(mut self, name: S, rules: Vec<ValidationRule>) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = rules,
            None => self.fields.push((name, rules)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&[ValidationRule]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationRule])> {
        self.fields
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of validating every field of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormValidationResult {
    /// True iff every field passed
    pub valid: bool,
    /// Per-field results in field order
    pub fields: Vec<(String, ValidationResult)>,
}

impl FormValidationResult {
    /// Result for a single field
    pub fn field(&self, name: &str) -> Option<&ValidationResult> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, result)| result)
    }

    /// Every error message paired with its field, in field then rule order
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .flat_map(|(field, result)| {
                result
                    .errors
                    .iter()
                    .map(move |message| (field.as_str(), message.as_str()))
            })
            .collect()
    }

    /// Names of the fields that failed
    pub fn invalid_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, result)| !result.valid)
            .map(|(field, _)| field.as_str())
            .collect()
    }
}

impl RuleValidator {
    /// Validate each field of `values` against its rules; absent fields are
    /// validated as `null`
    pub async fn validate_form(
        &self,
        values: &Map<String, Value>,
        rules: &FormRules,
    ) -> FormValidationResult {
        let mut valid = true;
        let mut fields = Vec::with_capacity(rules.len());

        for (name, field_rules) in rules.iter() {
            let value = values.get(name).unwrap_or(&ABSENT);
            let result = self.validate(value, field_rules).await;
            if !result.valid {
                tracing::debug!(field = name, errors = result.errors.len(), "form field failed validation");
            }
            valid &= result.valid;
            fields.push((name.to_string(), result));
        }

        FormValidationResult { valid, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RuleSetBuilder;
    use serde_json::json;

    fn host_form() -> FormRules {
        FormRules::new()
            .field(
                "hostname",
                RuleSetBuilder::new()
                    .required()
                    .message("hostname is required")
                    .pattern("^[a-z0-9.-]+$")
                    .build(),
            )
            .field("ip", RuleSetBuilder::new().required().pattern(r"^\d+\.\d+\.\d+\.\d+$").build())
            .field("port", RuleSetBuilder::new().number().param("min", 1).param("max", 65535).build())
    }

    #[tokio::test]
    async fn test_valid_form() {
        let validator = RuleValidator::new();
        let values = json!({"hostname": "db-01.lan", "ip": "10.0.0.5", "port": 5432});
        let result = validator
            .validate_form(values.as_object().unwrap(), &host_form())
            .await;

        assert!(result.valid);
        assert!(result.errors().is_empty());
        assert_eq!(result.fields.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_and_invalid_fields() {
        let validator = RuleValidator::new();
        let values = json!({"ip": "10.0.0.5", "port": 70000});
        let result = validator
            .validate_form(values.as_object().unwrap(), &host_form())
            .await;

        assert!(!result.valid);
        assert_eq!(result.invalid_fields(), vec!["hostname", "port"]);
        assert!(result.field("ip").unwrap().valid);

        let errors = result.errors();
        // the pattern rule still runs against the missing hostname
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ("hostname", "hostname is required"));
        assert_eq!(errors[1].0, "hostname");
        assert_eq!(errors[2].0, "port");
    }

    #[test]
    fn test_field_replaces_existing_rules() {
        let rules = FormRules::new()
            .field("name", vec![ValidationRule::required()])
            .field("name", vec![ValidationRule::email()]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("name").unwrap()[0], ValidationRule::email());
        assert!(rules.get("other").is_none());
    }
}
