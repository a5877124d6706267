//! Array schema validation.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;

use super::traits::SchemaLike;
use super::value_type_name;

/// A schema for sequences.
///
/// Each item is checked against the item schema at its own index path, so an
/// unknown song deep inside a playlist is reported as
/// `playlists[0].song_ids[2]`.
pub struct ArraySchema<S> {
    item_schema: S,
    min_len: Option<usize>,
    min_len_message: Option<String>,
    type_error_message: Option<String>,
}

impl<S: SchemaLike> ArraySchema<S> {
    pub fn new(item_schema: S) -> Self {
        Self {
            item_schema,
            min_len: None,
            min_len_message: None,
            type_error_message: None,
        }
    }

    /// Requires at least `min` items.
    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    /// Requires at least one item.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Sets the message of the length constraint, or the type error message
    /// when no length constraint was added yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if self.min_len.is_some() {
            self.min_len_message = Some(message.into());
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Checks the value is an array, then the length, then every item.
    pub fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Vec<Value>, SchemaErrors> {
        let arr = match value.as_array() {
            Some(a) => a,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected array".to_string());
                return Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("array"),
                ));
            }
        };

        let mut errors = Vec::new();

        if let Some(min) = self.min_len {
            if arr.len() < min {
                let msg = self.min_len_message.clone().unwrap_or_else(|| {
                    format!("array must have at least {} items, got {}", min, arr.len())
                });
                errors.push(
                    SchemaError::new(path.clone(), msg)
                        .with_code("min_length")
                        .with_expected(format!("at least {} items", min))
                        .with_got(format!("{} items", arr.len())),
                );
            }
        }

        let mut validated_items = Vec::with_capacity(arr.len());
        for (index, item) in arr.iter().enumerate() {
            match self.item_schema.validate_to_value(item, &path.push_index(index)) {
                Validation::Success(v) => validated_items.push(v),
                Validation::Failure(e) => errors.extend(e),
            }
        }

        SchemaErrors::into_validation(errors, validated_items)
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    type Output = Vec<Value>;

    fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Self::Output, SchemaErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate(value, path).map(Value::Array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StringSchema;
    use serde_json::json;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_rejects_non_array() {
        let schema = ArraySchema::new(StringSchema::new());
        let errors = unwrap_failure(schema.validate(&json!("1"), &JsonPath::from_field("song_ids")));
        assert_eq!(errors.first().code, "invalid_type");
        assert_eq!(errors.first().path.to_string(), "song_ids");
    }

    #[test]
    fn test_non_empty() {
        let schema = ArraySchema::new(StringSchema::new())
            .non_empty()
            .error("a playlist needs at least one song");

        assert!(schema.validate(&json!(["8"]), &JsonPath::root()).is_success());

        let errors = unwrap_failure(schema.validate(&json!([]), &JsonPath::root()));
        assert_eq!(errors.first().code, "min_length");
        assert_eq!(errors.first().message, "a playlist needs at least one song");
    }

    #[test]
    fn test_item_errors_carry_index() {
        let schema = ArraySchema::new(StringSchema::new());
        let path = JsonPath::from_field("song_ids");

        let errors = unwrap_failure(schema.validate(&json!(["1", 2, "3", null]), &path));
        assert_eq!(errors.len(), 2);

        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["song_ids[1]", "song_ids[3]"]);
    }

    #[test]
    fn test_validated_items_keep_order() {
        let schema = ArraySchema::new(StringSchema::new());
        let items = schema
            .validate(&json!(["b", "a", "b"]), &JsonPath::root())
            .into_result()
            .unwrap();
        assert_eq!(items, vec![json!("b"), json!("a"), json!("b")]);
    }
}
