//! Error types for the fallible edges of facility-taskview
//!
//! The display mappers themselves never fail; these cover config files,
//! task JSON input and kind-based dispatch.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid task record: {0}")]
    TaskParse(#[from] serde_json::Error),

    #[error("could not determine config directory")]
    NoConfigDir,

    /// Dispatch needs a `type` on the record (or an explicit override).
    #[error("task record has no type")]
    MissingTaskKind,

    #[error("unsupported task type '{0}'")]
    UnsupportedTaskKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
