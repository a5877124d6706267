//! Locations inside a mixtape or change document.
//!
//! Every error raised while checking or applying a document points at the
//! offending value with a [`JsonPath`] such as `playlists[2].song_ids[0]`.

use std::fmt::{self, Display};

/// A single step of a [`JsonPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key (e.g. `songs`, `user_id`)
    Field(String),
    /// A sequence position (e.g. `[0]`)
    Index(usize),
}

/// A path to a value in a JSON document.
///
/// Paths are immutable; `push_field` and `push_index` return extended copies
/// so a parent path can be shared by every element of a sequence.
///
/// # Example
///
/// ```rust
/// use mixtape::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("playlists")
///     .push_index(1)
///     .push_field("song_ids");
///
/// assert_eq!(path.to_string(), "playlists[1].song_ids");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The path of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a one-segment path pointing at a top-level key.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
