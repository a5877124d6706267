//! The validated mixtape.
//!
//! [`Library::from_value`] checks a raw mixtape document and builds one
//! `IndexMap` per entity kind. Each map is both the ordered entity sequence
//! and its id index, so a mutation can never leave the two out of step:
//! removing a playlist from the index removes it from the document.

use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::map::Entry;
use indexmap::IndexMap;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use stillwater::Validation;
use thiserror::Error;
use tracing::debug;

use crate::error::{SchemaError, SchemaErrors};
use crate::model::{Identified, Mixtape, Playlist, Song, User};
use crate::path::JsonPath;
use crate::schema::{ObjectSchema, Schema, StringSchema};

static PLAYLIST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("playlist id pattern is valid"));

/// A set of known ids, as consulted by [`check_playlist`].
pub trait IdSet {
    fn contains_id(&self, id: &str) -> bool;
}

impl<V> IdSet for IndexMap<String, V> {
    fn contains_id(&self, id: &str) -> bool {
        self.contains_key(id)
    }
}

impl IdSet for HashSet<String> {
    fn contains_id(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl IdSet for HashSet<&str> {
    fn contains_id(&self, id: &str) -> bool {
        self.contains(id)
    }
}

/// A playlist candidate that passed the shape predicate.
///
/// `id` is not checked at all: a playlist being created arrives with a
/// placeholder id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaylistDraft {
    pub id: Value,
    pub user_id: String,
    pub song_ids: Vec<String>,
}

fn playlist_shape() -> ObjectSchema {
    Schema::object()
        .field("id", Schema::any())
        .field("user_id", Schema::string())
        .field(
            "song_ids",
            Schema::array(Schema::string())
                .non_empty()
                .error("a playlist must contain at least one song"),
        )
        .additional_properties(false)
}

/// The playlist-shape predicate, with the reasons it fails.
///
/// `candidate` must be a mapping with exactly `id`, `user_id` and
/// `song_ids`; `song_ids` must be a non-empty list holding at least one
/// non-empty id, every one of them in `songs`; `user_id` must be in `users`.
pub fn check_playlist<S, U>(
    candidate: &Value,
    path: &JsonPath,
    songs: &S,
    users: &U,
) -> Validation<PlaylistDraft, SchemaErrors>
where
    S: IdSet + ?Sized,
    U: IdSet + ?Sized,
{
    let obj = match playlist_shape().validate(candidate, path) {
        Validation::Success(obj) => obj,
        Validation::Failure(e) => return Validation::Failure(e),
    };
    let draft: PlaylistDraft = match decode(obj, path) {
        Ok(draft) => draft,
        Err(e) => return Validation::Failure(SchemaErrors::single(e)),
    };

    let mut errors = Vec::new();
    let song_ids_path = path.push_field("song_ids");

    if draft.song_ids.iter().all(String::is_empty) {
        errors.push(
            SchemaError::new(
                song_ids_path.clone(),
                "a playlist must contain at least one song",
            )
            .with_code("empty_song_ids"),
        );
    }
    for (i, song_id) in draft.song_ids.iter().enumerate() {
        if !songs.contains_id(song_id) {
            errors.push(
                SchemaError::new(song_ids_path.push_index(i), "unknown song")
                    .with_code("unknown_song")
                    .with_got(song_id.clone()),
            );
        }
    }
    if !users.contains_id(&draft.user_id) {
        errors.push(
            SchemaError::new(path.push_field("user_id"), "unknown user")
                .with_code("unknown_user")
                .with_got(draft.user_id.clone()),
        );
    }

    SchemaErrors::into_validation(errors, draft)
}

/// Returns true if `candidate` is a well-formed playlist over the given ids.
///
/// ```rust
/// use std::collections::HashSet;
/// use mixtape::is_playlist;
/// use serde_json::json;
///
/// let songs: HashSet<&str> = ["8", "32", "23"].into();
/// let users: HashSet<&str> = ["2", "3"].into();
///
/// assert!(is_playlist(&json!({"id": "1", "user_id": "2", "song_ids": ["8", "32"]}), &songs, &users));
/// assert!(!is_playlist(&json!({"id": "1", "user_id": "2", "song_ids": []}), &songs, &users));
/// ```
pub fn is_playlist<S, U>(candidate: &Value, songs: &S, users: &U) -> bool
where
    S: IdSet + ?Sized,
    U: IdSet + ?Sized,
{
    check_playlist(candidate, &JsonPath::root(), songs, users).is_success()
}

/// Failure of a direct mutation on a [`Library`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("unknown user '{0}'")]
    UnknownUser(String),

    #[error("unknown song '{0}'")]
    UnknownSong(String),

    #[error("unknown playlist '{0}'")]
    UnknownPlaylist(String),

    #[error("a playlist must contain at least one song")]
    EmptyPlaylist,

    #[error("no playlist id left to assign")]
    PlaylistIdsExhausted,
}

/// Result of [`Library::add_song_to_playlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongAdded {
    Appended,
    /// The song was already in the playlist; nothing changed.
    AlreadyPresent,
}

/// A validated mixtape with id indexes over songs, users and playlists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    songs: IndexMap<String, Song>,
    users: IndexMap<String, User>,
    playlists: IndexMap<String, Playlist>,
}

impl Library {
    /// Validates a raw mixtape document.
    ///
    /// The root must hold exactly `songs`, `users` and `playlists`, each a
    /// list. Songs and users are checked first; playlists are only checked
    /// once those are clean, since they reference them.
    ///
    /// # Errors
    ///
    /// Every violation found is returned in one [`SchemaErrors`]; no partial
    /// library is produced.
    pub fn from_value(value: &Value) -> Result<Self, SchemaErrors> {
        let doc = mixtape_root()
            .validate(value, &JsonPath::root())
            .into_result()?;

        let mut errors = Vec::new();
        let songs = index_entities::<Song>(
            items(&doc, "songs"),
            &JsonPath::from_field("songs"),
            &song_schema(),
            "song",
            &mut errors,
        );
        let users = index_entities::<User>(
            items(&doc, "users"),
            &JsonPath::from_field("users"),
            &user_schema(),
            "user",
            &mut errors,
        );
        SchemaErrors::into_validation(std::mem::take(&mut errors), ()).into_result()?;

        let playlists_path = JsonPath::from_field("playlists");
        let id_schema = playlist_id_schema();
        let mut playlists = IndexMap::new();
        for (i, candidate) in items(&doc, "playlists").iter().enumerate() {
            let path = playlists_path.push_index(i);
            let draft = match check_playlist(candidate, &path, &songs, &users) {
                Validation::Success(draft) => draft,
                Validation::Failure(e) => {
                    errors.extend(e);
                    continue;
                }
            };
            let id = match id_schema.validate(&draft.id, &path.push_field("id")) {
                Validation::Success(id) => id,
                Validation::Failure(e) => {
                    errors.extend(e);
                    continue;
                }
            };
            if id.parse::<u64>().is_err() {
                errors.push(
                    SchemaError::new(path.push_field("id"), "playlist id is too large")
                        .with_code("out_of_range")
                        .with_expected(format!("at most {}", u64::MAX))
                        .with_got(id),
                );
                continue;
            }
            let playlist = Playlist {
                id,
                user_id: draft.user_id,
                song_ids: draft.song_ids,
            };
            insert_unique(&mut playlists, playlist, &path, "playlist", &mut errors);
        }
        SchemaErrors::into_validation(errors, ()).into_result()?;

        debug!(
            songs = songs.len(),
            users = users.len(),
            playlists = playlists.len(),
            "mixtape validated"
        );

        Ok(Self {
            songs,
            users,
            playlists,
        })
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        self.songs.get(id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.get(id)
    }

    pub fn contains_song(&self, id: &str) -> bool {
        self.songs.contains_key(id)
    }

    pub fn contains_user(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    pub fn contains_playlist(&self, id: &str) -> bool {
        self.playlists.contains_key(id)
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    /// Songs by id, in document order.
    pub fn song_index(&self) -> &IndexMap<String, Song> {
        &self.songs
    }

    pub fn user_index(&self) -> &IndexMap<String, User> {
        &self.users
    }

    pub fn playlist_index(&self) -> &IndexMap<String, Playlist> {
        &self.playlists
    }

    pub fn playlists(&self) -> impl Iterator<Item = &Playlist> {
        self.playlists.values()
    }

    /// The id the next created playlist receives: one more than the
    /// largest playlist id, or `"1"` when there are none.
    ///
    /// Every playlist id fits in a `u64`; [`Library::from_value`] rejects
    /// larger ones. Returns None once the id space is used up.
    pub fn next_playlist_id(&self) -> Option<String> {
        let max = self
            .playlists
            .keys()
            .filter_map(|id| id.parse::<u64>().ok())
            .max();
        match max {
            None => Some("1".to_string()),
            Some(max) => max.checked_add(1).map(|id| id.to_string()),
        }
    }

    /// Appends a new playlist with a freshly assigned id.
    ///
    /// # Errors
    ///
    /// Fails if `song_ids` holds no non-empty id or references an unknown
    /// song, or if `user_id` is unknown.
    pub fn create_playlist(
        &mut self,
        user_id: String,
        song_ids: Vec<String>,
    ) -> Result<&Playlist, LibraryError> {
        if song_ids.iter().all(String::is_empty) {
            return Err(LibraryError::EmptyPlaylist);
        }
        if !self.contains_user(&user_id) {
            return Err(LibraryError::UnknownUser(user_id));
        }
        if let Some(unknown) = song_ids.iter().find(|id| !self.songs.contains_key(*id)) {
            return Err(LibraryError::UnknownSong(unknown.clone()));
        }

        let id = self
            .next_playlist_id()
            .ok_or(LibraryError::PlaylistIdsExhausted)?;
        let playlist = Playlist {
            id: id.clone(),
            user_id,
            song_ids,
        };
        Ok(&*self.playlists.entry(id).or_insert(playlist))
    }

    /// Removes a playlist, keeping the order of the remaining ones.
    pub fn delete_playlist(&mut self, playlist_id: &str) -> Result<Playlist, LibraryError> {
        self.playlists
            .shift_remove(playlist_id)
            .ok_or_else(|| LibraryError::UnknownPlaylist(playlist_id.to_string()))
    }

    /// Appends `song_id` to a playlist unless it is already there.
    pub fn add_song_to_playlist(
        &mut self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<SongAdded, LibraryError> {
        if !self.contains_song(song_id) {
            return Err(LibraryError::UnknownSong(song_id.to_string()));
        }
        let playlist = self
            .playlists
            .get_mut(playlist_id)
            .ok_or_else(|| LibraryError::UnknownPlaylist(playlist_id.to_string()))?;

        if playlist.contains_song(song_id) {
            return Ok(SongAdded::AlreadyPresent);
        }
        playlist.song_ids.push(song_id.to_string());
        Ok(SongAdded::Appended)
    }

    /// Copies the library back into a serializable document.
    pub fn to_mixtape(&self) -> Mixtape {
        self.clone().into_mixtape()
    }

    pub fn into_mixtape(self) -> Mixtape {
        Mixtape {
            songs: self.songs.into_values().collect(),
            users: self.users.into_values().collect(),
            playlists: self.playlists.into_values().collect(),
        }
    }
}

fn mixtape_root() -> ObjectSchema {
    Schema::object()
        .field("songs", Schema::array(Schema::any()))
        .field("users", Schema::array(Schema::any()))
        .field("playlists", Schema::array(Schema::any()))
        .additional_properties(false)
        .error("a mixtape must be an object")
}

fn song_schema() -> ObjectSchema {
    Schema::object()
        .field("id", Schema::string())
        .field("artist", Schema::string())
        .field("title", Schema::string())
        .additional_properties(false)
}

fn user_schema() -> ObjectSchema {
    Schema::object()
        .field("id", Schema::string())
        .field("name", Schema::string())
        .additional_properties(false)
}

fn playlist_id_schema() -> StringSchema {
    Schema::string()
        .error("playlist id must be a string")
        .regex(PLAYLIST_ID.clone())
        .error("playlist id must be a decimal number")
}

fn items<'a>(doc: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    doc.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn decode<T: DeserializeOwned>(obj: Map<String, Value>, path: &JsonPath) -> Result<T, SchemaError> {
    serde_json::from_value(Value::Object(obj))
        .map_err(|e| SchemaError::new(path.clone(), e.to_string()).with_code("invalid_type"))
}

fn index_entities<T>(
    candidates: &[Value],
    path: &JsonPath,
    schema: &ObjectSchema,
    kind: &str,
    errors: &mut Vec<SchemaError>,
) -> IndexMap<String, T>
where
    T: DeserializeOwned + Identified,
{
    let mut index = IndexMap::with_capacity(candidates.len());
    for (i, candidate) in candidates.iter().enumerate() {
        let item_path = path.push_index(i);
        let entity = match schema.validate(candidate, &item_path) {
            Validation::Success(obj) => decode::<T>(obj, &item_path),
            Validation::Failure(e) => {
                errors.extend(e);
                continue;
            }
        };
        match entity {
            Ok(entity) => insert_unique(&mut index, entity, &item_path, kind, errors),
            Err(e) => errors.push(e),
        }
    }
    index
}

fn insert_unique<T: Identified>(
    index: &mut IndexMap<String, T>,
    entity: T,
    path: &JsonPath,
    kind: &str,
    errors: &mut Vec<SchemaError>,
) {
    match index.entry(entity.id().to_string()) {
        Entry::Occupied(existing) => errors.push(
            SchemaError::new(path.push_field("id"), format!("duplicate {} id", kind))
                .with_code("duplicate_id")
                .with_expected("unique id")
                .with_got(existing.key().clone()),
        ),
        Entry::Vacant(slot) => {
            slot.insert(entity);
        }
    }
}
