//! Error types for the mapper crate.

use std::path::PathBuf;

/// Errors that can occur while building or using a mapper.
///
/// "Not found" is never an error: resolution returns `None` and enumeration
/// returns `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    /// A logical path is malformed.
    #[error("invalid path: {0}")]
    Path(#[from] fsv_types::PathError),

    /// A directory exists but could not be listed.
    #[error("stat error: {0}")]
    Stat(#[from] fsv_stat::StatError),

    /// The provider root does not exist or is not a directory.
    #[error("provider root is not a directory: {}", .0.display())]
    InvalidRoot(PathBuf),

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for mapper results.
pub type MapperResult<T> = Result<T, MapperError>;
