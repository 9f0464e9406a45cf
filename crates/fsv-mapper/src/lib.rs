//! FileVault resource mapping for FsVault.
//!
//! [`FileVaultMapper`] turns a logical path into a [`Resource`] by
//! reconciling three sources of truth: plain files and directories under the
//! provider root, content nodes declared inside `.content.xml` / `name.xml`
//! descriptors (possibly several levels up), and the workspace filter.
//!
//! # Architecture
//!
//! - **Path resolution**: a plain file wins; otherwise the nearest descriptor
//!   on the way up that declares the path; otherwise a plain directory.
//! - **Ancestor content search**: walks from the requested path towards the
//!   provider root, pushing each consumed segment onto the sub-path asked of
//!   the next descriptor.
//! - **Child enumeration**: descriptor-declared children first, in
//!   declaration order, then filesystem entries in byte-wise name order,
//!   deduplicated and filtered.
//!
//! All filesystem questions go through a [`fsv_stat::FileStatOracle`].
//!
//! # Modules
//!
//! - [`config`] -- [`MapperConfig`] (TOML)
//! - [`error`] -- [`MapperError`]
//! - [`mapper`] -- [`FileVaultMapper`] and the lazy [`Children`] iterator
//! - [`resource`] -- [`Resource`] and its file/content variants

pub mod config;
pub mod error;
pub mod mapper;
pub mod resource;

pub use config::MapperConfig;
pub use error::{MapperError, MapperResult};
pub use mapper::{Children, FileVaultMapper};
pub use resource::{ContentResource, FileResource, Resource, ResourceKind};
