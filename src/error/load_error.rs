//! Errors from reading input documents and writing the result.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read, decode or write a document on disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// One or more input paths do not exist; one line per path.
    #[error("{}", missing_lines(.0))]
    Missing(Vec<PathBuf>),

    #[error("Unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The file {} is not proper json.\n{source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn missing_lines(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("No such file : {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
