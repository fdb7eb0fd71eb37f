use std::path::PathBuf;
use thiserror::Error;

/// Startup-fatal problems with the content catalog.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed content file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("content defines no channels")]
    NoChannels,
    #[error("channel `{channel}` references unknown program `{program}`")]
    UnknownProgram { channel: String, program: String },
}

/// Dialog input rejected on save/confirm. The dialog stays open and shows
/// the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name required")]
    NameRequired,
    #[error("A scheme with this name already exists")]
    DuplicateName,
    #[error("Invalid color for {field}")]
    InvalidColor { field: String },
    #[error("Selected file no longer exists")]
    PathMissing,
    #[error("Selected path is a directory")]
    PathIsDirectory,
    #[error("Select a file first")]
    NoSelection,
    #[error("Program `{0}` cannot be edited")]
    NotEditable(String),
}
