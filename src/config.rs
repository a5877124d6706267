//! Run configuration.

use std::path::{Path, PathBuf};

/// Where the result is written when no output path is given.
pub const DEFAULT_OUTPUT_PATH: &str = "./output.json";

/// Input and output locations of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mixtape_path: PathBuf,
    pub changes_path: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    /// A configuration writing to [`DEFAULT_OUTPUT_PATH`].
    pub fn new(mixtape_path: impl Into<PathBuf>, changes_path: impl Into<PathBuf>) -> Self {
        Self {
            mixtape_path: mixtape_path.into(),
            changes_path: changes_path.into(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }

    pub fn with_output(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Both input paths, mixtape first.
    pub fn inputs(&self) -> [&Path; 2] {
        [&self.mixtape_path, &self.changes_path]
    }
}
