//! Error types.
//!
//! Structural problems in either document are reported as [`SchemaErrors`],
//! a failing change as [`ApplyError`], and file handling as [`LoadError`].
//! [`MixtapeError`] wraps all three for the pipeline.

mod apply_error;
mod load_error;
mod schema_error;

pub use apply_error::ApplyError;
pub use load_error::LoadError;
pub use schema_error::{SchemaError, SchemaErrors};

use thiserror::Error;

/// Any failure of a mixtape run.
#[derive(Debug, Error)]
pub enum MixtapeError {
    /// The mixtape or change document is malformed.
    #[error("{0}")]
    Schema(#[from] SchemaErrors),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type Result<T> = std::result::Result<T, MixtapeError>;
