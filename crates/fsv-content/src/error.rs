//! Error types for descriptor parsing.

use std::path::PathBuf;

/// Errors that can occur while loading a descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The descriptor could not be read.
    #[error("cannot read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is not well-formed XML.
    #[error("malformed descriptor XML at byte {position}: {reason}")]
    Xml { position: u64, reason: String },

    /// The XML is well-formed but has no root element.
    #[error("descriptor has no root element")]
    MissingRoot,
}

/// Convenience alias for content results.
pub type ContentResult<T> = Result<T, ContentError>;
