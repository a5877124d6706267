//! String schema validation.

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;

use super::traits::SchemaLike;
use super::value_type_name;

#[derive(Clone)]
struct PatternConstraint {
    regex: Regex,
    message: Option<String>,
}

/// A schema for string values.
///
/// # Example
///
/// ```rust
/// use mixtape::{JsonPath, Schema};
/// use regex::Regex;
/// use serde_json::json;
///
/// let playlist_id = Schema::string()
///     .regex(Regex::new(r"^[0-9]+$").unwrap())
///     .error("playlist ids must be decimal numbers");
///
/// assert!(playlist_id.validate(&json!("12"), &JsonPath::root()).is_success());
/// assert!(playlist_id.validate(&json!("twelve"), &JsonPath::root()).is_failure());
/// assert!(playlist_id.validate(&json!(12), &JsonPath::root()).is_failure());
/// ```
#[derive(Clone, Default)]
pub struct StringSchema {
    patterns: Vec<PatternConstraint>,
    type_error_message: Option<String>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the string to match `regex`.
    pub fn regex(mut self, regex: Regex) -> Self {
        self.patterns.push(PatternConstraint {
            regex,
            message: None,
        });
        self
    }

    /// Sets the message of the most recent pattern, or the type error
    /// message when no pattern was added yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.patterns.last_mut() {
            Some(pattern) => pattern.message = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<String, SchemaErrors> {
        let s = match value.as_str() {
            Some(s) => s,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected string".to_string());
                return Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("string"),
                ));
            }
        };

        let errors: Vec<SchemaError> = self
            .patterns
            .iter()
            .filter(|p| !p.regex.is_match(s))
            .map(|p| {
                let msg = p
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("must match pattern {}", p.regex.as_str()));
                SchemaError::new(path.clone(), msg)
                    .with_code("pattern")
                    .with_expected(p.regex.as_str().to_string())
                    .with_got(format!("{:?}", s))
            })
            .collect();

        SchemaErrors::into_validation(errors, s.to_string())
    }
}

impl SchemaLike for StringSchema {
    type Output = String;

    fn validate(&self, value: &Value, path: &JsonPath) -> Validation<String, SchemaErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate(value, path).map(Value::String)
    }
}
