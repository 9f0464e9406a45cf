//! Error types for the stat oracle.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while inspecting the filesystem.
#[derive(Debug, Error)]
pub enum StatError {
    /// A directory could not be listed.
    #[error("cannot list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for stat operations.
pub type StatResult<T> = Result<T, StatError>;
