//! The mixtape document as plain serde types.
//!
//! These are the on-disk shapes. They are produced only by
//! [`Library::to_mixtape`](crate::Library::to_mixtape) after validation, and
//! serialize with keys in declaration order.

use serde::{Deserialize, Serialize};

/// An entity addressed by a string id.
pub trait Identified {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub artist: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// A user's ordered list of songs.
///
/// `song_ids` may repeat a song when the input document does; only
/// `add_song_to_playlist` refuses to add a song that is already present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub user_id: String,
    pub song_ids: Vec<String>,
}

impl Identified for Song {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Playlist {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Playlist {
    pub fn contains_song(&self, song_id: &str) -> bool {
        self.song_ids.iter().any(|id| id == song_id)
    }
}

/// The root document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mixtape {
    pub songs: Vec<Song>,
    pub users: Vec<User>,
    pub playlists: Vec<Playlist>,
}

impl Mixtape {
    /// Pretty-prints the document with two-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
