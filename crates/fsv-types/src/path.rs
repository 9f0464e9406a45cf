//! Helpers over `/`-separated logical paths.
//!
//! A logical path is always absolute and never ends with `/`, except the
//! root `/` itself. Segments are opaque repository names; escaping for the
//! filesystem is handled by [`crate::names`].

use crate::error::{PathError, Result};

/// The root logical path.
pub const ROOT: &str = "/";

/// Validate a logical path, returning `Ok(())` if it is well-formed.
///
/// # Examples
///
/// ```
/// use fsv_types::path::validate;
///
/// assert!(validate("/").is_ok());
/// assert!(validate("/apps/site").is_ok());
/// assert!(validate("apps").is_err());
/// assert!(validate("/apps/").is_err());
/// ```
pub fn validate(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(PathError::NotAbsolute {
            path: path.to_string(),
        });
    }
    if path == ROOT {
        return Ok(());
    }
    if path.ends_with('/') {
        return Err(PathError::TrailingSlash {
            path: path.to_string(),
        });
    }
    for segment in path[1..].split('/') {
        if segment.is_empty() {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
            });
        }
        if segment == "." || segment == ".." {
            return Err(PathError::RelativeSegment {
                path: path.to_string(),
            });
        }
    }
    Ok(())
}

/// Returns `true` for the root path.
pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// Parent of a logical path, or `None` for the root.
///
/// ```
/// use fsv_types::path::parent;
///
/// assert_eq!(parent("/a/b"), Some("/a"));
/// assert_eq!(parent("/a"), Some("/"));
/// assert_eq!(parent("/"), None);
/// ```
pub fn parent(path: &str) -> Option<&str> {
    if is_root(path) {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

/// Last segment of a logical path; empty for the root.
pub fn name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Append a child name to a logical path.
///
/// ```
/// use fsv_types::path::join;
///
/// assert_eq!(join("/", "apps"), "/apps");
/// assert_eq!(join("/apps", "site"), "/apps/site");
/// ```
pub fn join(parent: &str, child: &str) -> String {
    if is_root(parent) {
        format!("/{child}")
    } else {
        format!("{parent}/{child}")
    }
}

/// Segments of a logical path, root yields none.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn validate_accepts_well_formed() {
        assert!(validate("/").is_ok());
        assert!(validate("/a").is_ok());
        assert!(validate("/a/b.xml").is_ok());
        assert!(validate("/jcr:content/par").is_ok());
    }

    #[test]
    fn validate_rejects_malformed() {
        assert!(matches!(validate(""), Err(PathError::NotAbsolute { .. })));
        assert!(matches!(validate("a/b"), Err(PathError::NotAbsolute { .. })));
        assert!(matches!(validate("/a/"), Err(PathError::TrailingSlash { .. })));
        assert!(matches!(validate("/a//b"), Err(PathError::EmptySegment { .. })));
        assert!(matches!(validate("/a/../b"), Err(PathError::RelativeSegment { .. })));
    }

    #[test]
    fn parent_and_name() {
        assert_eq!(parent("/a/b/c"), Some("/a/b"));
        assert_eq!(name("/a/b/c"), "c");
        assert_eq!(name("/a"), "a");
        assert_eq!(name("/"), "");
    }

    #[test]
    fn segments_skip_root() {
        assert_eq!(segments("/").count(), 0);
        assert_eq!(segments("/a/b").collect::<Vec<_>>(), vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn join_then_split_is_identity(
            segs in proptest::collection::vec("[a-zA-Z0-9_:.-]{1,8}", 1..6)
        ) {
            prop_assume!(segs.iter().all(|s| s != "." && s != ".."));
            let mut path = ROOT.to_string();
            for s in &segs {
                path = join(&path, s);
            }
            prop_assert!(validate(&path).is_ok());
            prop_assert_eq!(name(&path), segs.last().unwrap().as_str());

            let mut current = path.as_str();
            let mut depth = 0;
            while let Some(p) = parent(current) {
                current = p;
                depth += 1;
            }
            prop_assert_eq!(current, ROOT);
            prop_assert_eq!(depth, segs.len());
        }
    }
}
