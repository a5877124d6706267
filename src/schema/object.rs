//! Object schema validation.
//!
//! [`ObjectSchema`] checks mappings with a fixed set of required keys. With
//! `additional_properties(false)` the key set must match exactly, which is
//! the rule every entity and change element follows.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;

use super::traits::SchemaLike;
use super::value_type_name;

/// A schema for JSON objects.
///
/// # Example
///
/// ```rust
/// use mixtape::{JsonPath, Schema};
/// use serde_json::json;
///
/// let song = Schema::object()
///     .field("id", Schema::string())
///     .field("artist", Schema::string())
///     .field("title", Schema::string())
///     .additional_properties(false);
///
/// let result = song.validate(
///     &json!({"id": "1", "artist": "Zedd", "title": "The Middle"}),
///     &JsonPath::root(),
/// );
/// assert!(result.is_success());
///
/// // extra keys are rejected
/// let result = song.validate(
///     &json!({"id": "1", "artist": "Zedd", "title": "The Middle", "year": 2018}),
///     &JsonPath::root(),
/// );
/// assert!(result.is_failure());
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, Box<dyn SchemaLike<Output = Value>>>,
    deny_unknown: bool,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            deny_unknown: false,
            type_error_message: None,
        }
    }

    /// Adds a required field checked against `schema`.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields
            .insert(name.into(), Box::new(SchemaWrapper(schema)));
        self
    }

    /// Whether keys not declared with [`field`](Self::field) are allowed.
    ///
    /// Unknown keys are allowed by default and copied to the output as-is.
    pub fn additional_properties(mut self, allow: bool) -> Self {
        self.deny_unknown = !allow;
        self
    }

    /// Sets the message used when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    pub fn validate(
        &self,
        value: &Value,
        path: &JsonPath,
    ) -> Validation<Map<String, Value>, SchemaErrors> {
        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected object".to_string());
                return Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("object"),
                ));
            }
        };

        let mut errors = Vec::new();
        let mut validated = Map::new();

        for (name, schema) in &self.fields {
            let field_path = path.push_field(name);

            match obj.get(name) {
                Some(field_value) => match schema.validate_to_value(field_value, &field_path) {
                    Validation::Success(v) => {
                        validated.insert(name.clone(), v);
                    }
                    Validation::Failure(e) => errors.extend(e),
                },
                None => {
                    errors.push(
                        SchemaError::new(
                            field_path,
                            format!("required field '{}' is missing", name),
                        )
                        .with_code("required")
                        .with_expected("value"),
                    );
                }
            }
        }

        for (key, value) in obj {
            if self.fields.contains_key(key) {
                continue;
            }
            if self.deny_unknown {
                errors.push(
                    SchemaError::new(path.push_field(key), format!("unknown field '{}'", key))
                        .with_code("additional_property"),
                );
            } else {
                validated.insert(key.clone(), value.clone());
            }
        }

        SchemaErrors::into_validation(errors, validated)
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ObjectSchema {
    type Output = Map<String, Value>;

    fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Self::Output, SchemaErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate(value, path).map(Value::Object)
    }
}

/// Adapts any schema to produce `Value`, so fields of different schema types
/// can live in the same map.
struct SchemaWrapper<S>(S);

impl<S: SchemaLike> SchemaLike for SchemaWrapper<S> {
    type Output = Value;

    fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.0.validate_to_value(value, path)
    }

    fn validate_to_value(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.0.validate_to_value(value, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AnySchema, StringSchema};
    use serde_json::json;

    fn unwrap_success<T, E: std::fmt::Debug>(v: Validation<T, E>) -> T {
        v.into_result().unwrap()
    }

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    fn user_schema() -> ObjectSchema {
        ObjectSchema::new()
            .field("id", StringSchema::new())
            .field("name", StringSchema::new())
            .additional_properties(false)
    }

    #[test]
    fn test_rejects_non_object() {
        let schema = user_schema();
        for value in [json!("user"), json!(1), json!(null), json!([])] {
            let errors = unwrap_failure(schema.validate(&value, &JsonPath::root()));
            assert_eq!(errors.first().code, "invalid_type");
        }
    }

    #[test]
    fn test_exact_keys_accepted() {
        let obj = unwrap_success(
            user_schema().validate(&json!({"id": "2", "name": "Dipika"}), &JsonPath::root()),
        );
        assert_eq!(obj.get("name"), Some(&json!("Dipika")));
    }

    #[test]
    fn test_missing_and_unknown_keys_both_reported() {
        let path = JsonPath::root().push_field("users").push_index(0);
        let errors = unwrap_failure(
            user_schema().validate(&json!({"id": "2", "nickname": "D"}), &path),
        );

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.with_code("required")[0].path.to_string(), "users[0].name");
        assert_eq!(
            errors.with_code("additional_property")[0].path.to_string(),
            "users[0].nickname"
        );
    }

    #[test]
    fn test_unknown_keys_allowed_by_default() {
        let schema = ObjectSchema::new().field("changes", AnySchema);
        let obj = unwrap_success(
            schema.validate(&json!({"changes": [], "comment": "x"}), &JsonPath::root()),
        );
        assert_eq!(obj.get("comment"), Some(&json!("x")));
    }

    #[test]
    fn test_field_errors_are_nested() {
        let errors = unwrap_failure(
            user_schema().validate(&json!({"id": 5, "name": "Albin"}), &JsonPath::root()),
        );
        assert_eq!(errors.first().path.to_string(), "id");
        assert_eq!(errors.first().code, "invalid_type");
    }

    #[test]
    fn test_missing_fields_reported_in_declaration_order() {
        let schema = user_schema();
        let errors = unwrap_failure(schema.validate(&json!({}), &JsonPath::root()));

        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["id", "name"]);
    }
}
