//! Descriptor content for FsVault.
//!
//! Content nodes are not backed by a file of their own; their properties and
//! children live in XML descriptors (`.content.xml` sidecars or same-named
//! `.xml` files). This crate parses those descriptors into a
//! [`ContentElement`] tree, caches the parsed trees per descriptor file, and
//! offers [`ContentFile`], a view that addresses one element inside a cached
//! tree by sub-path.
//!
//! # Key Types
//!
//! - [`ContentElement`] -- A parsed node with ordered properties and children
//! - [`PropertyValue`] -- A typed property value (`{Boolean}true`, `[a,b]`, ...)
//! - [`ContentFileCache`] -- Parsed descriptors keyed by file path
//! - [`ContentFile`] -- Descriptor + sub-path view used by the mapper

pub mod cache;
pub mod element;
pub mod error;
pub mod file;
pub mod parser;
pub mod value;

pub use cache::{ContentCacheConfig, ContentFileCache};
pub use element::ContentElement;
pub use error::{ContentError, ContentResult};
pub use file::ContentFile;
pub use parser::parse_jcr_xml;
pub use value::PropertyValue;
