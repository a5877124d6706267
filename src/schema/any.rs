//! A schema that accepts every value.

use serde_json::Value;
use stillwater::Validation;

use crate::error::SchemaErrors;
use crate::path::JsonPath;

use super::traits::SchemaLike;

/// Accepts any JSON value unchanged.
///
/// Used for keys whose presence matters but whose content is checked later,
/// such as a change's `payload` or a draft playlist's `id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySchema;

impl SchemaLike for AnySchema {
    type Output = Value;

    fn validate(&self, value: &Value, _path: &JsonPath) -> Validation<Value, SchemaErrors> {
        Validation::Success(value.clone())
    }

    fn validate_to_value(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors> {
        self.validate(value, path)
    }
}
