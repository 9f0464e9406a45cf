//! The FileVault resource mapper.
//!
//! Precedence during resolution of a logical path `P`:
//!
//! 1. a plain file at `P` (an `.xml` file only when no `P.dir` directory
//!    shadows it; `.content.xml` never),
//! 2. the nearest descriptor on the way up from `P` that declares `P`,
//! 3. a plain directory at `P`.
//!
//! The mapper is immutable after construction. The stat oracle and the
//! descriptor cache are shared behind `Arc` and handle their own locking.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fsv_content::{ContentFile, ContentFileCache};
use fsv_filter::WorkspaceFilter;
use fsv_stat::{FileStatCache, FileStatOracle};
use fsv_types::{
    path, to_platform_path, to_repository_name, DOT_CONTENT_XML, DOT_CONTENT_XML_SUFFIX, DOT_DIR,
    DOT_DIR_SUFFIX, XML_SUFFIX,
};
use tracing::{debug, error, info, warn};

use crate::config::MapperConfig;
use crate::error::{MapperError, MapperResult};
use crate::resource::{ContentResource, FileResource, Resource};

/// Maps logical paths onto a FileVault-style filesystem tree.
#[derive(Clone)]
pub struct FileVaultMapper {
    provider_root: PathBuf,
    filter: Option<Arc<WorkspaceFilter>>,
    content_cache: Arc<ContentFileCache>,
    stat: Arc<dyn FileStatOracle>,
}

impl fmt::Debug for FileVaultMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileVaultMapper")
            .field("provider_root", &self.provider_root)
            .field("filtered", &self.filter.is_some())
            .field("cached_descriptors", &self.content_cache.len())
            .finish()
    }
}

impl FileVaultMapper {
    /// Create a mapper over `provider_root`.
    ///
    /// When `filter_xml` is given and exists it is loaded as the workspace
    /// filter. A missing or unparseable filter leaves the mapper unfiltered.
    pub fn new(
        provider_root: impl Into<PathBuf>,
        filter_xml: Option<&Path>,
        content_cache: Arc<ContentFileCache>,
        stat: Arc<dyn FileStatOracle>,
    ) -> Self {
        let filter = filter_xml
            .and_then(|file| load_workspace_filter(file, stat.as_ref()))
            .map(Arc::new);
        Self {
            provider_root: provider_root.into(),
            filter,
            content_cache,
            stat,
        }
    }

    /// Build a mapper, its caches, and its filter from configuration.
    pub fn from_config(config: &MapperConfig) -> MapperResult<Self> {
        let stat: Arc<dyn FileStatOracle> = Arc::new(FileStatCache::new(&config.stat_cache));
        if !stat.is_directory(&config.provider_root) {
            return Err(MapperError::InvalidRoot(config.provider_root.clone()));
        }
        let content_cache = Arc::new(ContentFileCache::new(&config.content_cache));
        let mapper = Self::new(
            config.provider_root.clone(),
            config.filter_xml.as_deref(),
            content_cache,
            stat,
        );
        info!(
            root = %mapper.provider_root.display(),
            filtered = mapper.filter.is_some(),
            "mapper ready"
        );
        Ok(mapper)
    }

    /// Replace the workspace filter.
    pub fn with_filter(mut self, filter: WorkspaceFilter) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// A mapper identical to this one but asking a different stat oracle.
    pub fn with_stat_oracle(&self, stat: Arc<dyn FileStatOracle>) -> Self {
        Self {
            stat,
            ..self.clone()
        }
    }

    /// The directory mapped to `/`.
    pub fn provider_root(&self) -> &Path {
        &self.provider_root
    }

    /// The loaded workspace filter, if any.
    pub fn workspace_filter(&self) -> Option<&WorkspaceFilter> {
        self.filter.as_deref()
    }

    /// The descriptor cache shared by this mapper.
    pub fn content_cache(&self) -> &ContentFileCache {
        &self.content_cache
    }

    // ---------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------

    /// Resolve a logical path to a resource, or `None` if nothing is there.
    pub fn resolve(&self, path: &str) -> Option<Resource> {
        if let Err(e) = path::validate(path) {
            debug!(path, error = %e, "rejecting malformed path");
            return None;
        }
        if !self.is_visible(path) {
            debug!(path, "path hidden by filter");
            return None;
        }

        let file = self.direct_file(path);
        if let Some(file) = &file {
            if self.stat.is_file(file) {
                return Some(Resource::File(FileResource::new(path, file.clone())));
            }
        }

        if let Some(content) = self.find_content(path, None) {
            debug!(path, descriptor = %content.file().display(), "resolved content node");
            return Some(Resource::Content(ContentResource::new(path, content)));
        }

        match file {
            Some(file) if self.stat.is_directory(&file) => {
                Some(Resource::Directory(FileResource::new(path, file)))
            }
            _ => None,
        }
    }

    /// Children of a logical path.
    ///
    /// Returns `Ok(None)` when the path has no visible children, whether or
    /// not the path itself resolves; use [`Self::resolve`] to tell the two
    /// apart.
    pub fn children(&self, parent_path: &str) -> MapperResult<Option<Children<'_>>> {
        path::validate(parent_path)?;

        let mut child_paths = OrderedPaths::default();

        if let Some(content) = self.find_content(parent_path, None) {
            for (name, _) in content.children() {
                let child = path::join(parent_path, name);
                if self.path_matches(&child) {
                    child_paths.insert(child);
                }
            }
        }

        let parent_dir = self
            .direct_file(parent_path)
            .filter(|dir| self.stat.is_directory(dir));
        if let Some(dir) = parent_dir {
            let mut entries = self.stat.list_dir(&dir)?;
            entries.sort();

            for entry in entries {
                let Some(name) = entry.to_str() else {
                    warn!(dir = %dir.display(), entry = ?entry, "skipping non UTF-8 entry");
                    continue;
                };
                if name == DOT_CONTENT_XML {
                    continue;
                }
                if name.ends_with(DOT_DIR) && self.stat.is_directory(&dir.join(name)) {
                    continue;
                }

                let child = path::join(parent_path, &to_repository_name(name));
                if self.direct_file(&child).is_some()
                    && self.path_matches(&child)
                    && !child_paths.contains(&child)
                {
                    child_paths.insert(child);
                    continue;
                }

                // node.xml declares node
                let candidate = match child.strip_suffix(XML_SUFFIX) {
                    Some(stripped) if !stripped.ends_with('/') => stripped.to_string(),
                    _ => child.clone(),
                };
                if self.path_matches(&candidate)
                    && !child_paths.contains(&candidate)
                    && self.find_content(&candidate, None).is_some()
                {
                    child_paths.insert(candidate);
                }
            }
        }

        if child_paths.is_empty() {
            return Ok(None);
        }
        debug!(parent = parent_path, count = child_paths.len(), "enumerated children");
        Ok(Some(Children {
            mapper: self,
            paths: child_paths.into_vec().into_iter(),
        }))
    }

    // ---------------------------------------------------------------
    // Filter
    // ---------------------------------------------------------------

    /// Returns `true` if `path` is not a reserved artifact and the workspace
    /// filter (if any) contains it.
    pub fn path_matches(&self, path: &str) -> bool {
        if is_reserved(path) {
            return false;
        }
        match &self.filter {
            None => true,
            Some(filter) => filter.contains(path),
        }
    }

    /// [`Self::path_matches`], but ancestors of filter roots also pass so
    /// `resolve` can still reach the tree above filtered content. Enumeration
    /// uses the strict check.
    fn is_visible(&self, path: &str) -> bool {
        if is_reserved(path) {
            return false;
        }
        match &self.filter {
            None => true,
            Some(filter) => filter.contains(path) || filter.is_ancestor(path),
        }
    }

    // ---------------------------------------------------------------
    // Path mapping
    // ---------------------------------------------------------------

    fn platform_file(&self, path: &str) -> PathBuf {
        let platform = to_platform_path(path);
        let relative = platform.trim_start_matches('/');
        if relative.is_empty() {
            self.provider_root.clone()
        } else {
            self.provider_root.join(relative)
        }
    }

    /// The on-disk file or directory directly backing `path`, if it exists.
    fn direct_file(&self, path: &str) -> Option<PathBuf> {
        if path.ends_with(DOT_CONTENT_XML_SUFFIX) {
            return None;
        }
        let file = self.platform_file(path);
        if !self.stat.exists(&file) {
            return None;
        }
        if path.ends_with(XML_SUFFIX) && self.has_dot_dir(&file) {
            return None;
        }
        Some(file)
    }

    fn has_dot_dir(&self, file: &Path) -> bool {
        self.stat.is_directory(&with_suffix(file, DOT_DIR))
    }

    /// Find the descriptor declaring `path`, walking up towards the root.
    ///
    /// Each step tries `<path>/.content.xml`, then `<path>.xml` unless a
    /// `<path>.xml.dir` directory shadows it, then moves to the parent with
    /// the consumed segment pushed onto `sub_path`.
    fn find_content(&self, path: &str, sub_path: Option<String>) -> Option<ContentFile> {
        let mut path = path.to_string();
        let mut sub_path = sub_path;

        loop {
            let dir = self.platform_file(&path);

            let sidecar = dir.join(DOT_CONTENT_XML);
            if self.stat.exists(&sidecar) {
                let content = ContentFile::new(
                    sidecar,
                    path.as_str(),
                    sub_path.clone(),
                    &self.content_cache,
                );
                if content.has_content() {
                    return Some(content);
                }
            }

            if !path::is_root(&path) {
                let same_name = with_suffix(&dir, XML_SUFFIX);
                if self.stat.exists(&same_name) && !self.has_dot_dir(&same_name) {
                    let content = ContentFile::new(
                        same_name,
                        path.as_str(),
                        sub_path.clone(),
                        &self.content_cache,
                    );
                    if content.has_content() {
                        return Some(content);
                    }
                }
            }

            let parent = path::parent(&path)?.to_string();
            let name = path::name(&path);
            sub_path = Some(match sub_path {
                Some(sub) => format!("{name}/{sub}"),
                None => name.to_string(),
            });
            path = parent;
        }
    }
}

/// Lazily resolves enumerated child paths into resources.
///
/// Single pass: each path is resolved when reached, and paths that no longer
/// resolve are skipped.
pub struct Children<'a> {
    mapper: &'a FileVaultMapper,
    paths: std::vec::IntoIter<String>,
}

impl Children<'_> {
    /// Child paths not yet resolved, in enumeration order.
    pub fn paths(&self) -> &[String] {
        self.paths.as_slice()
    }
}

impl Iterator for Children<'_> {
    type Item = Resource;

    fn next(&mut self) -> Option<Resource> {
        for path in self.paths.by_ref() {
            if let Some(resource) = self.mapper.resolve(&path) {
                return Some(resource);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.paths.len()))
    }
}

impl fmt::Debug for Children<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("remaining", &self.paths.as_slice())
            .finish()
    }
}

/// Insertion-ordered set of paths; the first insertion wins.
#[derive(Debug, Default)]
struct OrderedPaths {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedPaths {
    fn insert(&mut self, path: String) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.order.push(path);
        true
    }

    fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn into_vec(self) -> Vec<String> {
        self.order
    }
}

fn is_reserved(path: &str) -> bool {
    path.ends_with(DOT_DIR_SUFFIX) || path.ends_with(DOT_CONTENT_XML_SUFFIX)
}

fn with_suffix(file: &Path, suffix: &str) -> PathBuf {
    let mut s = file.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

fn load_workspace_filter(file: &Path, stat: &dyn FileStatOracle) -> Option<WorkspaceFilter> {
    if !stat.exists(file) {
        debug!(file = %file.display(), "workspace filter not found");
        return None;
    }
    match WorkspaceFilter::load(file) {
        Ok(filter) => {
            info!(
                file = %file.display(),
                sets = filter.filter_sets().len(),
                "loaded workspace filter"
            );
            Some(filter)
        }
        Err(e) => {
            error!(file = %file.display(), error = %e, "unable to parse workspace filter");
            None
        }
    }
}
