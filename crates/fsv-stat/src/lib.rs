//! File existence and type oracle for FsVault.
//!
//! The mapper never stats the filesystem directly; every existence, type, and
//! listing question goes through a [`FileStatOracle`]. [`FileStatCache`] is
//! the production implementation: it remembers the outcome of each `stat`
//! for a configurable time-to-live so that repeated resolution of sibling
//! paths does not hit the disk again.
//!
//! # Modules
//!
//! - [`error`] -- [`StatError`] for listing failures
//! - [`traits`] -- The [`FileStatOracle`] trait and [`FileKind`]
//! - [`cache`] -- [`FileStatCache`] and [`DirectFileStat`]

pub mod cache;
pub mod error;
pub mod traits;

pub use cache::{DirectFileStat, FileStatCache, StatCacheConfig};
pub use error::{StatError, StatResult};
pub use traits::{FileKind, FileStatOracle};
