//! Filter sets and the workspace filter.
//!
//! ```text
//! <workspaceFilter version="1.0">
//!     <filter root="/apps/site" mode="merge">
//!         <include pattern="/apps/site(/.*)?"/>
//!         <exclude pattern="/apps/site/private(/.*)?"/>
//!     </filter>
//! </workspaceFilter>
//! ```
//!
//! A filter set contains a path when the path is at or below its root and the
//! last rule matching the path is an include. When no rule matches, the
//! outcome is the opposite of the first rule's kind, so a set that starts
//! with an exclude includes everything else and vice versa.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;
use tracing::debug;

use crate::error::{FilterError, FilterResult};

/// How a filter set is applied on import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Content under the root is replaced.
    #[default]
    Replace,
    /// Existing content is kept, new content is added.
    Merge,
    /// Existing content is updated, new content is added.
    Update,
}

impl FromStr for ImportMode {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            "update" => Ok(ImportMode::Update),
            other => Err(FilterError::Config(format!("unknown import mode: {other:?}"))),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportMode::Replace => "replace",
            ImportMode::Merge => "merge",
            ImportMode::Update => "update",
        };
        f.write_str(s)
    }
}

/// One include or exclude rule.
#[derive(Clone, Debug)]
pub struct FilterRule {
    include: bool,
    pattern: String,
    regex: Regex,
}

impl FilterRule {
    fn new(include: bool, pattern: &str) -> FilterResult<Self> {
        Ok(Self {
            include,
            pattern: pattern.to_string(),
            regex: Regex::new(&format!("^(?:{pattern})$"))?,
        })
    }

    /// Returns `true` for include rules.
    pub fn is_include(&self) -> bool {
        self.include
    }

    /// The pattern as written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the pattern matches the whole path.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// A root path with ordered include/exclude rules.
#[derive(Clone, Debug)]
pub struct PathFilterSet {
    root: String,
    mode: ImportMode,
    rules: Vec<FilterRule>,
}

impl PathFilterSet {
    /// A set covering `root` with no rules (everything below is contained).
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            mode: ImportMode::default(),
            rules: Vec::new(),
        }
    }

    /// Set the import mode.
    pub fn with_mode(mut self, mode: ImportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Append an include rule.
    pub fn include(mut self, pattern: &str) -> FilterResult<Self> {
        self.rules.push(FilterRule::new(true, pattern)?);
        Ok(self)
    }

    /// Append an exclude rule.
    pub fn exclude(mut self, pattern: &str) -> FilterResult<Self> {
        self.rules.push(FilterRule::new(false, pattern)?);
        Ok(self)
    }

    /// The root path of the set.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The import mode of the set.
    pub fn mode(&self) -> ImportMode {
        self.mode
    }

    /// The rules in declaration order.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Returns `true` if `path` is the root or lies below it.
    pub fn covers(&self, path: &str) -> bool {
        if self.root == "/" {
            return path.starts_with('/');
        }
        path == self.root
            || path
                .strip_prefix(self.root.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Returns `true` if `path` is a strict ancestor of the root.
    pub fn is_ancestor(&self, path: &str) -> bool {
        if path == self.root {
            return false;
        }
        if path == "/" {
            return true;
        }
        self.root
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Returns `true` if `path` is covered and not excluded by the rules.
    pub fn contains(&self, path: &str) -> bool {
        if !self.covers(path) {
            return false;
        }
        let Some(first) = self.rules.first() else {
            return true;
        };
        let mut result = !first.include;
        for rule in &self.rules {
            if rule.matches(path) {
                result = rule.include;
            }
        }
        result
    }
}

/// The set of filter sets declared by a package.
#[derive(Clone, Debug, Default)]
pub struct WorkspaceFilter {
    sets: Vec<PathFilterSet>,
}

impl WorkspaceFilter {
    /// A filter from explicit sets.
    pub fn new(sets: Vec<PathFilterSet>) -> Self {
        Self { sets }
    }

    /// Read and parse a `filter.xml` file.
    pub fn load(file: &Path) -> FilterResult<Self> {
        let xml = fs::read_to_string(file).map_err(|source| FilterError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::parse(&xml)
    }

    /// Parse `filter.xml` content.
    pub fn parse(xml: &str) -> FilterResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut sets = Vec::new();
        let mut current: Option<PathFilterSet> = None;
        let mut seen_root = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| FilterError::Xml(e.to_string()))?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_empty = matches!(event, Event::Empty(_));
                    let name = element_name(e)?;
                    if !seen_root {
                        if name != "workspaceFilter" {
                            return Err(FilterError::Config(format!(
                                "expected <workspaceFilter>, found <{name}>"
                            )));
                        }
                        seen_root = true;
                        continue;
                    }
                    match name.as_str() {
                        "filter" => {
                            let root = attribute(e, "root")?.ok_or_else(|| {
                                FilterError::Config("<filter> without root attribute".into())
                            })?;
                            let mut set = PathFilterSet::new(root);
                            if let Some(mode) = attribute(e, "mode")? {
                                set = set.with_mode(mode.parse()?);
                            }
                            if is_empty {
                                sets.push(set);
                            } else {
                                current = Some(set);
                            }
                        }
                        "include" | "exclude" => {
                            let set = current.take().ok_or_else(|| {
                                FilterError::Config(format!("<{name}> outside of <filter>"))
                            })?;
                            let pattern = attribute(e, "pattern")?.ok_or_else(|| {
                                FilterError::Config(format!("<{name}> without pattern attribute"))
                            })?;
                            let set = if name == "include" {
                                set.include(&pattern)?
                            } else {
                                set.exclude(&pattern)?
                            };
                            current = Some(set);
                        }
                        other => debug!(element = other, "ignoring unknown filter element"),
                    }
                }
                Event::End(ref e) => {
                    if e.name().as_ref() == b"filter" {
                        if let Some(set) = current.take() {
                            sets.push(set);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(FilterError::Config("document has no <workspaceFilter>".into()));
        }
        Ok(Self { sets })
    }

    /// The filter sets in declaration order.
    pub fn filter_sets(&self) -> &[PathFilterSet] {
        &self.sets
    }

    /// Returns `true` if any set contains `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.sets.iter().any(|set| set.contains(path))
    }

    /// Returns `true` if any set covers `path`, regardless of its rules.
    pub fn covers(&self, path: &str) -> bool {
        self.sets.iter().any(|set| set.covers(path))
    }

    /// Returns `true` if `path` is a strict ancestor of some filter root.
    pub fn is_ancestor(&self, path: &str) -> bool {
        self.sets.iter().any(|set| set.is_ancestor(path))
    }
}

fn element_name(e: &BytesStart<'_>) -> FilterResult<String> {
    std::str::from_utf8(e.name().as_ref())
        .map(str::to_string)
        .map_err(|err| FilterError::Xml(err.to_string()))
}

fn attribute(e: &BytesStart<'_>, name: &str) -> FilterResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| FilterError::Xml(err.to_string()))?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| FilterError::Xml(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workspaceFilter version="1.0">
    <filter root="/apps/site"/>
    <filter root="/content/site" mode="merge">
        <include pattern="/content/site(/.*)?"/>
        <exclude pattern="/content/site/private(/.*)?"/>
    </filter>
</workspaceFilter>
"#;

    #[test]
    fn parses_sets() {
        let filter = WorkspaceFilter::parse(FILTER).unwrap();
        let sets = filter.filter_sets();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].root(), "/apps/site");
        assert_eq!(sets[0].mode(), ImportMode::Replace);
        assert_eq!(sets[1].mode(), ImportMode::Merge);
        assert_eq!(sets[1].rules().len(), 2);
        assert!(sets[1].rules()[0].is_include());
        assert_eq!(sets[1].rules()[1].pattern(), "/content/site/private(/.*)?");
    }

    #[test]
    fn contains_respects_roots_and_rules() {
        let filter = WorkspaceFilter::parse(FILTER).unwrap();
        assert!(filter.contains("/apps/site"));
        assert!(filter.contains("/apps/site/components/page"));
        assert!(!filter.contains("/apps/sitemap"));
        assert!(filter.contains("/content/site/en"));
        assert!(!filter.contains("/content/site/private"));
        assert!(!filter.contains("/content/site/private/x"));
        assert!(!filter.contains("/libs"));
    }

    #[test]
    fn ancestors_of_roots() {
        let filter = WorkspaceFilter::parse(FILTER).unwrap();
        assert!(filter.is_ancestor("/"));
        assert!(filter.is_ancestor("/apps"));
        assert!(!filter.is_ancestor("/apps/site"));
        assert!(!filter.is_ancestor("/ap"));
        assert!(filter.covers("/content/site/private"));
    }

    #[test]
    fn exclude_first_includes_the_rest() {
        let set = PathFilterSet::new("/")
            .exclude("/private(/.*)?")
            .unwrap();
        assert!(set.contains("/public/x"));
        assert!(!set.contains("/private"));
        assert!(!set.contains("/private/x"));
    }

    #[test]
    fn include_first_excludes_the_rest() {
        let set = PathFilterSet::new("/a").include("/a/b(/.*)?").unwrap();
        assert!(set.contains("/a/b/c"));
        assert!(!set.contains("/a/c"));
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            WorkspaceFilter::parse("<other/>"),
            Err(FilterError::Config(_))
        ));
        assert!(matches!(
            WorkspaceFilter::parse("<workspaceFilter><filter/></workspaceFilter>"),
            Err(FilterError::Config(_))
        ));
        assert!(matches!(
            WorkspaceFilter::parse(r#"<workspaceFilter><filter root="/a" mode="nope"/></workspaceFilter>"#),
            Err(FilterError::Config(_))
        ));
        assert!(matches!(
            WorkspaceFilter::parse(r#"<workspaceFilter><filter root="/a"><include pattern="("/></filter></workspaceFilter>"#),
            Err(FilterError::Pattern(_))
        ));
        assert!(matches!(WorkspaceFilter::parse(""), Err(FilterError::Config(_))));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = WorkspaceFilter::load(&dir.path().join("filter.xml"));
        assert!(matches!(result, Err(FilterError::Io { .. })));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("filter.xml");
        fs::write(&file, FILTER).unwrap();
        let filter = WorkspaceFilter::load(&file).unwrap();
        assert_eq!(filter.filter_sets().len(), 2);
    }
}
