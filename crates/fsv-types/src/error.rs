//! Error types for logical path handling.

use thiserror::Error;

/// Errors raised when a string is not a well-formed logical path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path does not start with `/`.
    #[error("logical path must be absolute: {path:?}")]
    NotAbsolute { path: String },

    /// The path ends with `/` (only the root may).
    #[error("logical path must not end with '/': {path:?}")]
    TrailingSlash { path: String },

    /// The path contains an empty segment (`//`).
    #[error("logical path contains an empty segment: {path:?}")]
    EmptySegment { path: String },

    /// The path contains a `.` or `..` segment.
    #[error("logical path contains a relative segment: {path:?}")]
    RelativeSegment { path: String },
}

/// Convenience alias for path operations.
pub type Result<T> = std::result::Result<T, PathError>;
