//! A view of one element inside a cached descriptor.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fsv_types::path;

use crate::cache::ContentFileCache;
use crate::element::ContentElement;

/// A descriptor file plus the sub-path of the element it denotes.
///
/// `path` is the logical path of the node the descriptor itself describes;
/// `sub_path`, when present, addresses a nested element below it. Two views on
/// the same descriptor with different sub-paths are different nodes.
#[derive(Clone, Debug)]
pub struct ContentFile {
    file: PathBuf,
    path: String,
    sub_path: Option<String>,
    root: Option<Arc<ContentElement>>,
}

impl ContentFile {
    /// Build a view, loading the descriptor through `cache`.
    pub fn new(
        file: impl Into<PathBuf>,
        path: impl Into<String>,
        sub_path: Option<String>,
        cache: &ContentFileCache,
    ) -> Self {
        let file = file.into();
        let root = cache.get(&file);
        Self {
            file,
            path: path.into(),
            sub_path: sub_path.filter(|s| !s.is_empty()),
            root,
        }
    }

    /// The descriptor file on disk.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Logical path of the descriptor's root node.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of the addressed element relative to the descriptor root.
    pub fn sub_path(&self) -> Option<&str> {
        self.sub_path.as_deref()
    }

    /// Logical path of the addressed element.
    pub fn logical_path(&self) -> String {
        match &self.sub_path {
            Some(sub) => path::join(&self.path, sub),
            None => self.path.clone(),
        }
    }

    /// The addressed element, if the descriptor declares it.
    pub fn content(&self) -> Option<&ContentElement> {
        let root = self.root.as_deref()?;
        root.get(self.sub_path.as_deref().unwrap_or(""))
    }

    /// Returns `true` if the descriptor parsed and declares the element.
    pub fn has_content(&self) -> bool {
        self.content().is_some()
    }

    /// Direct children of the addressed element in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ContentElement)> {
        self.content().into_iter().flat_map(|c| c.children())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TREE: &str = r#"<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0">
        <b><c><d/><e/></c></b>
    </jcr:root>"#;

    fn setup() -> (tempfile::TempDir, PathBuf, ContentFileCache) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".content.xml");
        fs::write(&file, TREE).unwrap();
        (dir, file, ContentFileCache::default())
    }

    #[test]
    fn root_view() {
        let (_dir, file, cache) = setup();
        let cf = ContentFile::new(&file, "/a", None, &cache);
        assert!(cf.has_content());
        assert_eq!(cf.logical_path(), "/a");
        assert_eq!(cf.children().map(|(n, _)| n).collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn nested_view() {
        let (_dir, file, cache) = setup();
        let cf = ContentFile::new(&file, "/a", Some("b/c".into()), &cache);
        assert!(cf.has_content());
        assert_eq!(cf.logical_path(), "/a/b/c");
        assert_eq!(
            cf.children().map(|(n, _)| n).collect::<Vec<_>>(),
            vec!["d", "e"]
        );
    }

    #[test]
    fn missing_sub_path_has_no_content() {
        let (_dir, file, cache) = setup();
        let cf = ContentFile::new(&file, "/a", Some("b/x".into()), &cache);
        assert!(!cf.has_content());
        assert_eq!(cf.children().count(), 0);
    }

    #[test]
    fn root_descriptor_logical_path() {
        let (_dir, file, cache) = setup();
        let cf = ContentFile::new(&file, "/", Some("b".into()), &cache);
        assert_eq!(cf.logical_path(), "/b");
    }

    #[test]
    fn unreadable_descriptor_has_no_content() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ContentFileCache::default();
        let cf = ContentFile::new(dir.path().join("nope.xml"), "/nope", None, &cache);
        assert!(!cf.has_content());
        assert_eq!(cf.file(), dir.path().join("nope.xml"));
    }
}
