//! Structural validation errors.
//!
//! [`SchemaError`] describes one violated rule of the mixtape or change
//! document. [`SchemaErrors`] is the non-empty batch a validator returns; it
//! renders as a single multi-line message.

use std::fmt::{self, Display};

use stillwater::prelude::*;
use stillwater::Validation;

use crate::path::JsonPath;

/// A single structural or referential violation.
///
/// # Example
///
/// ```rust
/// use mixtape::{JsonPath, SchemaError};
///
/// let error = SchemaError::new(
///     JsonPath::root().push_field("playlists").push_index(0).push_field("user_id"),
///     "unknown user",
/// )
/// .with_code("unknown_user")
/// .with_got("42");
///
/// assert_eq!(error.to_string(), "playlists[0].user_id: unknown user (got: 42)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Where the violation was found.
    pub path: JsonPath,
    pub message: String,
    /// The offending value, rendered as text.
    pub got: Option<String>,
    pub expected: Option<String>,
    /// Machine-readable code (`invalid_type`, `duplicate_id`, `unknown_song`, ...).
    pub code: String,
}

impl SchemaError {
    /// Creates an error with the generic `validation_error` code.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// A non-empty batch of [`SchemaError`]s.
///
/// Validators accumulate every violation they can see in one pass and hand
/// them back together; the run still aborts as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Turns a list of collected errors into a validation outcome.
    ///
    /// Succeeds with `value` when nothing was collected.
    pub fn into_validation<T>(errors: Vec<SchemaError>, value: T) -> Validation<T, SchemaErrors> {
        let mut errors = errors.into_iter();
        match errors.next() {
            None => Validation::Success(value),
            Some(first) => Validation::Failure(
                errors.fold(Self::single(first), |acc, e| acc.combine(Self::single(e))),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the batch holds at least one error.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns all errors with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song_id_path(index: usize) -> JsonPath {
        JsonPath::root()
            .push_field("songs")
            .push_index(index)
            .push_field("id")
    }

    #[test]
    fn test_display_with_context() {
        let error = SchemaError::new(song_id_path(1), "duplicate song id")
            .with_code("duplicate_id")
            .with_expected("unique id")
            .with_got("\"7\"");

        assert_eq!(
            error.to_string(),
            "songs[1].id: duplicate song id (expected: unique id) (got: \"7\")"
        );
    }

    #[test]
    fn test_display_root() {
        let error = SchemaError::new(JsonPath::root(), "expected object");
        assert_eq!(error.to_string(), "(root): expected object");
    }

    #[test]
    fn test_default_code() {
        let error = SchemaError::new(JsonPath::root(), "broken");
        assert_eq!(error.code, "validation_error");
    }

    #[test]
    fn test_into_validation_empty_is_success() {
        let result = SchemaErrors::into_validation(Vec::new(), 5);
        assert!(result.is_success());
    }

    #[test]
    fn test_into_validation_keeps_every_error_in_order() {
        let errors = vec![
            SchemaError::new(song_id_path(0), "first").with_code("duplicate_id"),
            SchemaError::new(song_id_path(1), "second").with_code("invalid_type"),
            SchemaError::new(song_id_path(2), "third").with_code("duplicate_id"),
        ];

        let errors = SchemaErrors::into_validation(errors, ())
            .into_result()
            .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.first().message, "first");
        assert_eq!(errors.with_code("duplicate_id").len(), 2);
        assert_eq!(errors.iter().nth(1).map(|e| &e.path), Some(&song_id_path(1)));
    }

    #[test]
    fn test_batch_display() {
        let errors = SchemaErrors::single(SchemaError::new(song_id_path(0), "missing"))
            .combine(SchemaErrors::single(SchemaError::new(
                JsonPath::from_field("users"),
                "expected array",
            )));

        let display = errors.to_string();
        assert!(display.starts_with("Validation failed with 2 error(s):"));
        assert!(display.contains("  1. songs[0].id: missing"));
        assert!(display.contains("  2. users: expected array"));
    }
}
