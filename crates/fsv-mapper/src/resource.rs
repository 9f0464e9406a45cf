//! Resources handed out by the mapper.
//!
//! A resource is either backed by a plain file, by a plain directory, or by an
//! element inside a descriptor. The variant records which source won during
//! resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use fsv_content::{ContentElement, ContentFile, PropertyValue};
use serde::Serialize;

/// Resource type reported for plain files.
pub const NT_FILE: &str = "nt:file";

/// Resource type reported for plain directories.
pub const NT_FOLDER: &str = "nt:folder";

/// Which source a resource was resolved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Directory,
    Content,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::File => "file",
            ResourceKind::Directory => "directory",
            ResourceKind::Content => "content",
        };
        f.write_str(s)
    }
}

/// A resource backed by a file or directory on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileResource {
    path: String,
    file: PathBuf,
}

impl FileResource {
    pub(crate) fn new(path: impl Into<String>, file: PathBuf) -> Self {
        Self {
            path: path.into(),
            file,
        }
    }

    /// Logical path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Backing file or directory.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// A resource backed by an element inside a descriptor.
#[derive(Clone, Debug)]
pub struct ContentResource {
    path: String,
    content: ContentFile,
}

impl ContentResource {
    pub(crate) fn new(path: impl Into<String>, content: ContentFile) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    /// Logical path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The descriptor view this resource was resolved from.
    pub fn content_file(&self) -> &ContentFile {
        &self.content
    }

    /// The declared element.
    pub fn element(&self) -> Option<&ContentElement> {
        self.content.content()
    }
}

/// A resolved node of the virtual namespace.
#[derive(Clone, Debug)]
pub enum Resource {
    File(FileResource),
    Directory(FileResource),
    Content(ContentResource),
}

impl Resource {
    /// Logical path.
    pub fn path(&self) -> &str {
        match self {
            Resource::File(r) | Resource::Directory(r) => r.path(),
            Resource::Content(r) => r.path(),
        }
    }

    /// Last segment of the logical path.
    pub fn name(&self) -> &str {
        fsv_types::path::name(self.path())
    }

    /// Which source the resource was resolved from.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::File(_) => ResourceKind::File,
            Resource::Directory(_) => ResourceKind::Directory,
            Resource::Content(_) => ResourceKind::Content,
        }
    }

    /// The backing file, directory, or descriptor on disk.
    pub fn file(&self) -> &Path {
        match self {
            Resource::File(r) | Resource::Directory(r) => r.file(),
            Resource::Content(r) => r.content_file().file(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Resource::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Resource::Directory(_))
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Resource::Content(_))
    }

    /// Declared properties; empty for file-backed resources.
    pub fn properties(&self) -> BTreeMap<String, PropertyValue> {
        match self {
            Resource::Content(r) => r
                .element()
                .map(|e| e.properties().clone())
                .unwrap_or_default(),
            _ => BTreeMap::new(),
        }
    }

    /// `sling:resourceType` / `jcr:primaryType` for content,
    /// `nt:file` / `nt:folder` otherwise.
    pub fn resource_type(&self) -> Option<&str> {
        match self {
            Resource::File(_) => Some(NT_FILE),
            Resource::Directory(_) => Some(NT_FOLDER),
            Resource::Content(r) => r.element().and_then(ContentElement::resource_type),
        }
    }
}
