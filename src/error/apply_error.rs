//! Failures raised while applying a change batch.

use thiserror::Error;

/// A change that cannot be applied to the library.
///
/// Both variants abort the remaining batch. `index` is the position of the
/// failing element inside `changes`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    #[error("Invalid payload for `{kind}` (change #{index}): {reason}. Payload: {payload}")]
    InvalidPayload {
        index: usize,
        kind: String,
        reason: String,
        payload: String,
    },

    #[error("Operation {kind} is not supported (change #{index}).")]
    Unsupported { index: usize, kind: String },
}

impl ApplyError {
    /// Position of the failing change in the batch.
    pub fn index(&self) -> usize {
        match self {
            ApplyError::InvalidPayload { index, .. } | ApplyError::Unsupported { index, .. } => {
                *index
            }
        }
    }

    /// The declared operation type, as written in the change.
    pub fn kind(&self) -> &str {
        match self {
            ApplyError::InvalidPayload { kind, .. } | ApplyError::Unsupported { kind, .. } => kind,
        }
    }
}
