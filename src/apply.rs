//! Applying a change batch to a library.
//!
//! Changes run strictly in order. The first change that cannot be applied
//! stops the batch; changes before it stay applied in memory, and the caller
//! is expected to discard the library.

use tracing::debug;

use crate::changes::{AddSongToPlaylist, ChangeOperation, ChangeSet, CreatePlaylist, DeletePlaylist};
use crate::error::ApplyError;
use crate::library::{Library, LibraryError, SongAdded};

/// What a single applied operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A playlist was created with this id.
    Created(String),
    Deleted(String),
    SongAdded,
    /// The song was already in the playlist.
    SongAlreadyPresent,
}

/// Totals for a fully applied batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Ids assigned to created playlists, in creation order.
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub songs_added: usize,
    pub duplicate_adds: usize,
}

impl ApplySummary {
    /// Number of operations applied.
    pub fn applied(&self) -> usize {
        self.created.len() + self.deleted.len() + self.songs_added + self.duplicate_adds
    }

    fn record(&mut self, applied: Applied) {
        match applied {
            Applied::Created(id) => self.created.push(id),
            Applied::Deleted(id) => self.deleted.push(id),
            Applied::SongAdded => self.songs_added += 1,
            Applied::SongAlreadyPresent => self.duplicate_adds += 1,
        }
    }
}

/// Applies one typed operation.
pub fn apply_operation(
    library: &mut Library,
    operation: ChangeOperation,
) -> Result<Applied, LibraryError> {
    match operation {
        ChangeOperation::CreatePlaylist(CreatePlaylist { user_id, song_ids }) => library
            .create_playlist(user_id, song_ids)
            .map(|playlist| Applied::Created(playlist.id.clone())),
        ChangeOperation::DeletePlaylist(DeletePlaylist { playlist_id }) => library
            .delete_playlist(&playlist_id)
            .map(|playlist| Applied::Deleted(playlist.id)),
        ChangeOperation::AddSongToPlaylist(AddSongToPlaylist {
            playlist_id,
            song_id,
        }) => match library.add_song_to_playlist(&playlist_id, &song_id)? {
            SongAdded::Appended => Ok(Applied::SongAdded),
            SongAdded::AlreadyPresent => Ok(Applied::SongAlreadyPresent),
        },
    }
}

/// Applies every change in `changes` to `library`, in order.
///
/// # Errors
///
/// Returns the [`ApplyError`] of the first change that has an unsupported
/// type, a payload of the wrong shape, or references an unknown playlist,
/// song or user.
pub fn apply_changes(library: &mut Library, changes: &ChangeSet) -> Result<ApplySummary, ApplyError> {
    let mut summary = ApplySummary::default();

    for (index, change) in changes.iter().enumerate() {
        let operation = change.parse(index, library)?;
        let kind = operation.kind();
        let applied =
            apply_operation(library, operation).map_err(|e| change.invalid(index, e.to_string()))?;

        debug!(index, kind, ?applied, "change applied");
        summary.record(applied);
    }

    Ok(summary)
}
