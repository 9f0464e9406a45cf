//! Workspace filters for FsVault.
//!
//! A workspace filter (`META-INF/vault/filter.xml` in a content package)
//! declares which parts of the namespace a package owns: a list of filter
//! sets, each with a root path and ordered include/exclude rules. The mapper
//! hides every path the filter does not contain.
//!
//! # Modules
//!
//! - [`error`] -- [`FilterError`]
//! - [`filter`] -- [`WorkspaceFilter`], [`PathFilterSet`], [`ImportMode`]

pub mod error;
pub mod filter;

pub use error::{FilterError, FilterResult};
pub use filter::{FilterRule, ImportMode, PathFilterSet, WorkspaceFilter};
