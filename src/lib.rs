//! # Mixtape
//!
//! Validates a music-library document (songs, users, playlists) and applies
//! an ordered batch of playlist changes to it.
//!
//! ## Overview
//!
//! A run is parse → validate → mutate → serialize:
//!
//! - [`Library::from_value`] checks the mixtape's shape, id uniqueness and
//!   references, and builds id indexes over songs, users and playlists.
//! - [`ChangeSet::from_value`] checks the outer shape of the change document.
//! - [`apply_changes`] applies `create_playlist`, `delete_playlist` and
//!   `add_song_to_playlist` in order, stopping at the first invalid one.
//! - [`Library::into_mixtape`] yields the document to serialize.
//!
//! Structural problems are reported as [`SchemaErrors`], which accumulate
//! every violation found with its [`JsonPath`]; a change that cannot be
//! applied is an [`ApplyError`].
//!
//! ## Example
//!
//! ```rust
//! use mixtape::{apply_changes, ChangeSet, Library};
//! use serde_json::json;
//!
//! let mut library = Library::from_value(&json!({
//!     "songs": [{ "id": "1", "artist": "Zedd", "title": "The Middle" }],
//!     "users": [{ "id": "1", "name": "Albin Jaye" }],
//!     "playlists": []
//! }))
//! .unwrap();
//!
//! let changes = ChangeSet::from_value(&json!({
//!     "changes": [
//!         { "type": "create_playlist", "payload": { "user_id": "1", "song_ids": ["1"] } }
//!     ]
//! }))
//! .unwrap();
//!
//! let summary = apply_changes(&mut library, &changes).unwrap();
//! assert_eq!(summary.created, vec!["1"]);
//! assert_eq!(library.into_mixtape().playlists[0].song_ids, vec!["1"]);
//! ```

pub mod apply;
pub mod changes;
pub mod config;
pub mod error;
pub mod library;
pub mod model;
pub mod path;
pub mod pipeline;
pub mod schema;

pub use apply::{apply_changes, apply_operation, Applied, ApplySummary};
pub use changes::{
    AddSongToPlaylist, ChangeOperation, ChangeSet, CreatePlaylist, DeletePlaylist, RawChange,
};
pub use config::{Config, DEFAULT_OUTPUT_PATH};
pub use error::{ApplyError, LoadError, MixtapeError, Result, SchemaError, SchemaErrors};
pub use library::{check_playlist, is_playlist, IdSet, Library, LibraryError, PlaylistDraft, SongAdded};
pub use model::{Identified, Mixtape, Playlist, Song, User};
pub use path::{JsonPath, PathSegment};
pub use pipeline::transform;
pub use schema::{AnySchema, ArraySchema, ObjectSchema, Schema, SchemaLike, StringSchema};

/// Outcome of a schema check.
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
