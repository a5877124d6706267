//! Load, validate, apply, write.
//!
//! [`transform`] is the whole in-memory pipeline; [`run`] wraps it with file
//! handling. The output file is only written once every change applied.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::apply::{apply_changes, ApplySummary};
use crate::changes::ChangeSet;
use crate::config::Config;
use crate::error::{LoadError, Result};
use crate::library::Library;
use crate::model::Mixtape;

/// Fails with every input path that does not exist.
pub fn check_inputs<'a>(paths: impl IntoIterator<Item = &'a Path>) -> std::result::Result<(), LoadError> {
    let missing: Vec<PathBuf> = paths
        .into_iter()
        .filter(|path| !path.exists())
        .map(Path::to_path_buf)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::Missing(missing))
    }
}

/// Reads and decodes one JSON document.
pub fn load_json(path: &Path) -> std::result::Result<Value, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the document pretty-printed with two-space indentation.
pub fn write_mixtape(path: &Path, mixtape: &Mixtape) -> std::result::Result<(), LoadError> {
    let write_error = |source: std::io::Error| LoadError::Write {
        path: path.to_path_buf(),
        source,
    };
    let text = mixtape
        .to_pretty_json()
        .map_err(|e| write_error(e.into()))?;
    fs::write(path, text).map_err(write_error)
}

/// Validates both documents and applies the changes.
///
/// The mixtape is validated before the change document; either failing
/// aborts before anything is applied.
pub fn transform(mixtape: &Value, changes: &Value) -> Result<(Mixtape, ApplySummary)> {
    let mut library = Library::from_value(mixtape)?;
    let changes = ChangeSet::from_value(changes)?;
    info!(changes = changes.len(), "documents validated");

    let summary = apply_changes(&mut library, &changes)?;
    Ok((library.into_mixtape(), summary))
}

/// Runs the pipeline described by `config`.
pub fn run(config: &Config) -> Result<ApplySummary> {
    check_inputs(config.inputs())?;

    let mixtape = load_json(&config.mixtape_path)?;
    let changes = load_json(&config.changes_path)?;
    info!(
        mixtape = %config.mixtape_path.display(),
        changes = %config.changes_path.display(),
        "documents loaded"
    );

    let (result, summary) = transform(&mixtape, &changes)?;

    write_mixtape(&config.output_path, &result)?;
    info!(output = %config.output_path.display(), "mixtape written");

    Ok(summary)
}
