//! The [`FileStatOracle`] trait.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

use crate::error::{StatError, StatResult};

/// What a filesystem path currently points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Nothing exists at the path.
    Missing,
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Something else (socket, fifo, device, ...).
    Other,
}

impl FileKind {
    /// Stat `path` on the real filesystem, following symlinks.
    pub fn probe(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => FileKind::File,
            Ok(meta) if meta.is_dir() => FileKind::Directory,
            Ok(_) => FileKind::Other,
            Err(e) if e.kind() == io::ErrorKind::NotFound => FileKind::Missing,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stat failed; treating as missing");
                FileKind::Missing
            }
        }
    }

    /// Returns `true` unless the kind is [`FileKind::Missing`].
    pub fn exists(self) -> bool {
        self != FileKind::Missing
    }
}

/// Answers existence and type questions about on-disk paths.
///
/// Implementations must be thread-safe (`Send + Sync`) and return consistent
/// answers for repeated queries within one resolution call. Caching and
/// freshness policy are up to the implementation.
pub trait FileStatOracle: Send + Sync {
    /// Classify the given path.
    fn stat(&self, path: &Path) -> FileKind;

    /// Returns `true` if anything exists at `path`.
    fn exists(&self, path: &Path) -> bool {
        self.stat(path).exists()
    }

    /// Returns `true` if `path` is a regular file.
    fn is_file(&self, path: &Path) -> bool {
        self.stat(path) == FileKind::File
    }

    /// Returns `true` if `path` is a directory.
    fn is_directory(&self, path: &Path) -> bool {
        self.stat(path) == FileKind::Directory
    }

    /// List the entry names of a directory, in no particular order.
    fn list_dir(&self, dir: &Path) -> StatResult<Vec<OsString>> {
        let read = fs::read_dir(dir).map_err(|source| StatError::ListDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in read {
            let entry = entry.map_err(|source| StatError::ListDir {
                path: dir.to_path_buf(),
                source,
            })?;
            names.push(entry.file_name());
        }
        Ok(names)
    }
}
