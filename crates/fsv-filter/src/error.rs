//! Error types for workspace filter loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a workspace filter.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The filter file could not be read.
    #[error("cannot read workspace filter {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filter file is not well-formed XML.
    #[error("malformed workspace filter XML: {0}")]
    Xml(String),

    /// The XML is well-formed but does not describe a valid filter.
    #[error("invalid workspace filter: {0}")]
    Config(String),

    /// A rule pattern is not a valid regular expression.
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience alias for filter results.
pub type FilterResult<T> = Result<T, FilterError>;
