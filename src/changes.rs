//! The change document and its typed operations.
//!
//! [`ChangeSet::from_value`] only checks the outer shape: a `changes` list of
//! `{type, payload}` mappings. Each element's payload is checked when it is
//! about to be applied, by [`RawChange::parse`], which turns it into a
//! [`ChangeOperation`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ApplyError, SchemaErrors};
use crate::library::{check_playlist, Library};
use crate::path::JsonPath;
use crate::schema::{ObjectSchema, Schema};

pub const CREATE_PLAYLIST: &str = "create_playlist";
pub const DELETE_PLAYLIST: &str = "delete_playlist";
pub const ADD_SONG_TO_PLAYLIST: &str = "add_song_to_playlist";

/// One element of `changes`, with `type` and `payload` still unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChange {
    pub kind: Value,
    pub payload: Value,
}

/// Payload of `create_playlist`. Any `id` in the payload is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlaylist {
    pub user_id: String,
    pub song_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletePlaylist {
    pub playlist_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddSongToPlaylist {
    pub playlist_id: String,
    pub song_id: String,
}

/// A change whose payload has the exact shape its type requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOperation {
    CreatePlaylist(CreatePlaylist),
    DeletePlaylist(DeletePlaylist),
    AddSongToPlaylist(AddSongToPlaylist),
}

impl ChangeOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeOperation::CreatePlaylist(_) => CREATE_PLAYLIST,
            ChangeOperation::DeletePlaylist(_) => DELETE_PLAYLIST,
            ChangeOperation::AddSongToPlaylist(_) => ADD_SONG_TO_PLAYLIST,
        }
    }
}

impl RawChange {
    /// The declared type as text; non-string types render as JSON.
    pub fn kind_name(&self) -> String {
        match &self.kind {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Checks the payload against the shape its type requires.
    ///
    /// `create_playlist` payloads go through the playlist-shape predicate
    /// with their `id` forced to null, so referenced songs and user are
    /// checked against `library` here. The other types only check keys and
    /// value types; existence of their ids is checked on apply.
    ///
    /// # Errors
    ///
    /// `ApplyError::Unsupported` for an unknown type regardless of the
    /// payload, `ApplyError::InvalidPayload` for a payload of the wrong shape.
    pub fn parse(&self, index: usize, library: &Library) -> Result<ChangeOperation, ApplyError> {
        let path = JsonPath::from_field("changes")
            .push_index(index)
            .push_field("payload");

        match self.kind.as_str() {
            Some(CREATE_PLAYLIST) => {
                let mut candidate = self.payload.clone();
                if let Some(obj) = candidate.as_object_mut() {
                    obj.insert("id".to_string(), Value::Null);
                }
                let draft = check_playlist(
                    &candidate,
                    &path,
                    library.song_index(),
                    library.user_index(),
                )
                .into_result()
                .map_err(|e| self.invalid(index, describe(&e)))?;

                Ok(ChangeOperation::CreatePlaylist(CreatePlaylist {
                    user_id: draft.user_id,
                    song_ids: draft.song_ids,
                }))
            }
            Some(DELETE_PLAYLIST) => self
                .decode(index, &delete_schema(), &path)
                .map(ChangeOperation::DeletePlaylist),
            Some(ADD_SONG_TO_PLAYLIST) => self
                .decode(index, &add_song_schema(), &path)
                .map(ChangeOperation::AddSongToPlaylist),
            _ => Err(ApplyError::Unsupported {
                index,
                kind: self.kind_name(),
            }),
        }
    }

    /// Builds an `InvalidPayload` error for this change.
    pub fn invalid(&self, index: usize, reason: impl Into<String>) -> ApplyError {
        ApplyError::InvalidPayload {
            index,
            kind: self.kind_name(),
            reason: reason.into(),
            payload: self.payload.to_string(),
        }
    }

    fn decode<T: DeserializeOwned>(
        &self,
        index: usize,
        schema: &ObjectSchema,
        path: &JsonPath,
    ) -> Result<T, ApplyError> {
        let obj = schema
            .validate(&self.payload, path)
            .into_result()
            .map_err(|e| self.invalid(index, describe(&e)))?;
        serde_json::from_value(Value::Object(obj)).map_err(|e| self.invalid(index, e.to_string()))
    }
}

/// A validated change document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    changes: Vec<RawChange>,
}

impl ChangeSet {
    /// Checks the shape of a change document.
    ///
    /// The root must be a mapping with a `changes` list; other root keys are
    /// ignored. Every element must be a mapping with exactly `type` and
    /// `payload`, whose values are not inspected yet.
    ///
    /// ```rust
    /// use mixtape::ChangeSet;
    /// use serde_json::json;
    ///
    /// let changes = ChangeSet::from_value(&json!({
    ///     "changes": [{ "type": "delete_playlist", "payload": { "playlist_id": "2" } }]
    /// }))
    /// .unwrap();
    /// assert_eq!(changes.len(), 1);
    ///
    /// assert!(ChangeSet::from_value(&json!({ "changes": [{ "type": "delete_playlist" }] })).is_err());
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, SchemaErrors> {
        let doc = change_root()
            .validate(value, &JsonPath::root())
            .into_result()?;

        let changes = doc
            .get("changes")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(RawChange::from_validated)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { changes })
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawChange> {
        self.changes.iter()
    }
}

impl From<Vec<RawChange>> for ChangeSet {
    fn from(changes: Vec<RawChange>) -> Self {
        Self { changes }
    }
}

impl RawChange {
    fn from_validated(obj: &Map<String, Value>) -> Self {
        Self {
            kind: obj.get("type").cloned().unwrap_or(Value::Null),
            payload: obj.get("payload").cloned().unwrap_or(Value::Null),
        }
    }
}

fn change_root() -> ObjectSchema {
    Schema::object()
        .field(
            "changes",
            Schema::array(
                Schema::object()
                    .field("type", Schema::any())
                    .field("payload", Schema::any())
                    .additional_properties(false)
                    .error("a change must be an object with `type` and `payload`"),
            ),
        )
        .error("a change file must be an object")
}

fn delete_schema() -> ObjectSchema {
    Schema::object()
        .field("playlist_id", Schema::string())
        .additional_properties(false)
        .error("payload must be an object")
}

fn add_song_schema() -> ObjectSchema {
    Schema::object()
        .field("playlist_id", Schema::string())
        .field("song_id", Schema::string())
        .additional_properties(false)
        .error("payload must be an object")
}

/// Joins a batch of errors into one line.
fn describe(errors: &SchemaErrors) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
