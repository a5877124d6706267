//! Shape checking for JSON documents.
//!
//! A small builder vocabulary used to describe the mixtape and change
//! documents. Every schema accumulates all the violations it finds in a
//! value instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use mixtape::{JsonPath, Schema};
//! use serde_json::json;
//!
//! let user = Schema::object()
//!     .field("id", Schema::string())
//!     .field("name", Schema::string())
//!     .additional_properties(false);
//!
//! assert!(user.validate(&json!({"id": "1", "name": "Albin Jaye"}), &JsonPath::root()).is_success());
//! assert!(user.validate(&json!({"id": "1"}), &JsonPath::root()).is_failure());
//! ```

mod any;
mod array;
mod object;
mod string;
mod traits;

pub use any::AnySchema;
pub use array::ArraySchema;
pub use object::ObjectSchema;
pub use string::StringSchema;
pub use traits::SchemaLike;

use serde_json::Value;

/// Factory for schema builders.
pub struct Schema;

impl Schema {
    /// A schema accepting strings.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// A schema accepting sequences whose items satisfy `item`.
    ///
    /// ```rust
    /// use mixtape::{JsonPath, Schema};
    /// use serde_json::json;
    ///
    /// let song_ids = Schema::array(Schema::string()).non_empty();
    ///
    /// assert!(song_ids.validate(&json!(["1", "2"]), &JsonPath::root()).is_success());
    /// assert!(song_ids.validate(&json!([]), &JsonPath::root()).is_failure());
    /// ```
    pub fn array<S: SchemaLike>(item: S) -> ArraySchema<S> {
        ArraySchema::new(item)
    }

    /// A schema accepting mappings with the declared fields.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// A schema accepting anything.
    pub fn any() -> AnySchema {
        AnySchema
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
