//! Shared vocabulary for FsVault.
//!
//! FsVault maps a filesystem subtree onto a virtual resource namespace where
//! some nodes live inside XML descriptor files. This crate holds the pieces
//! every other crate agrees on: the reserved file names of the descriptor
//! convention, helpers over `/`-separated logical paths, and the escaping
//! between logical names and on-disk names.
//!
//! # Modules
//!
//! - [`error`] -- [`PathError`] for malformed logical paths
//! - [`path`] -- parent/name/join helpers over logical paths
//! - [`names`] -- platform name escaping (`jcr:content` <-> `_jcr_content`)

pub mod error;
pub mod names;
pub mod path;

pub use error::{PathError, Result};
pub use names::{to_platform_name, to_platform_path, to_repository_name, to_repository_path};

/// Name of the sidecar descriptor placed inside a node's own directory.
pub const DOT_CONTENT_XML: &str = ".content.xml";

/// `/` + [`DOT_CONTENT_XML`]; a logical path ending in this is a descriptor.
pub const DOT_CONTENT_XML_SUFFIX: &str = "/.content.xml";

/// Generic XML suffix used by same-name descriptors (`node.xml`).
pub const XML_SUFFIX: &str = ".xml";

/// Suffix of the directory that shadows a same-named file (`file.xml.dir`).
pub const DOT_DIR: &str = ".dir";

/// `/` + [`DOT_DIR`].
pub const DOT_DIR_SUFFIX: &str = "/.dir";
