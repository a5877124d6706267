//! The trait shared by every schema type.

use serde_json::Value;
use stillwater::Validation;

use crate::error::SchemaErrors;
use crate::path::JsonPath;

/// A schema that can check a JSON value.
///
/// Implementors can be nested inside [`ObjectSchema`](super::ObjectSchema)
/// fields and [`ArraySchema`](super::ArraySchema) items, which is how the
/// song, user, playlist and change shapes are assembled.
pub trait SchemaLike: Send + Sync {
    /// What a successful check produces.
    type Output;

    /// Checks `value`, reporting violations relative to `path`.
    fn validate(&self, value: &Value, path: &JsonPath) -> Validation<Self::Output, SchemaErrors>;

    /// Checks `value` and returns the accepted value as plain JSON.
    fn validate_to_value(&self, value: &Value, path: &JsonPath) -> Validation<Value, SchemaErrors>;
}
