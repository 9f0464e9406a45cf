//! Escaping between repository names and platform (on-disk) names.
//!
//! Rules:
//! - A namespaced name `prefix:local` is stored as `_prefix_local`
//! - A name that would be mistaken for that form (`_a_b`) gets an extra
//!   leading underscore (`__a_b`)
//! - `%`, `\`, `/`, `:`, `*`, `?`, `"`, `<`, `>`, `|` and control characters
//!   are stored as `%XX` per UTF-8 byte

/// Characters that cannot appear verbatim in a platform name.
const ESCAPED_CHARS: &[char] = &['%', '\\', '/', ':', '*', '?', '"', '<', '>', '|'];

fn needs_escape(ch: char) -> bool {
    ESCAPED_CHARS.contains(&ch) || ch.is_control()
}

fn escape_into(out: &mut String, s: &str) {
    let mut buf = [0u8; 4];
    for ch in s.chars() {
        if needs_escape(ch) {
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        } else {
            out.push(ch);
        }
    }
}

fn unescape(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    match String::from_utf8(out) {
        Ok(decoded) => decoded,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

/// A namespace prefix is only folded into `_prefix_` form when it survives
/// the round trip unescaped.
fn is_plain_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.contains('_') && !prefix.chars().any(needs_escape)
}

/// Convert a repository name to its platform name.
///
/// ```
/// use fsv_types::names::to_platform_name;
///
/// assert_eq!(to_platform_name("jcr:content"), "_jcr_content");
/// assert_eq!(to_platform_name("_a_b"), "__a_b");
/// assert_eq!(to_platform_name("what?"), "what%3F");
/// ```
pub fn to_platform_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut rest = name;

    match name.find(':') {
        Some(idx) if is_plain_prefix(&name[..idx]) => {
            out.push('_');
            out.push_str(&name[..idx]);
            out.push('_');
            rest = &name[idx + 1..];
        }
        _ => {
            if name.starts_with('_') && name[1..].contains('_') {
                out.push('_');
            }
        }
    }

    escape_into(&mut out, rest);
    out
}

/// Convert a platform name back to its repository name.
///
/// ```
/// use fsv_types::names::to_repository_name;
///
/// assert_eq!(to_repository_name("_jcr_content"), "jcr:content");
/// assert_eq!(to_repository_name("__a_b"), "_a_b");
/// assert_eq!(to_repository_name("what%3F"), "what?");
/// ```
pub fn to_repository_name(name: &str) -> String {
    if let Some(rest) = name.strip_prefix("__") {
        return format!("_{}", unescape(rest));
    }
    if let Some(rest) = name.strip_prefix('_') {
        if let Some(idx) = rest.find('_') {
            if idx > 0 {
                let prefix = &rest[..idx];
                let local = &rest[idx + 1..];
                return format!("{}:{}", unescape(prefix), unescape(local));
            }
        }
    }
    unescape(name)
}

/// Convert every segment of a logical path to its platform name.
pub fn to_platform_path(path: &str) -> String {
    map_segments(path, to_platform_name)
}

/// Convert every segment of a platform path to its repository name.
pub fn to_repository_path(path: &str) -> String {
    map_segments(path, to_repository_name)
}

fn map_segments(path: &str, f: fn(&str) -> String) -> String {
    path.split('/')
        .map(|segment| if segment.is_empty() { String::new() } else { f(segment) })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_names_untouched() {
        assert_eq!(to_platform_name("site"), "site");
        assert_eq!(to_platform_name("image.png"), "image.png");
        assert_eq!(to_repository_name("image.png"), "image.png");
        assert_eq!(to_platform_name("_single"), "_single");
        assert_eq!(to_repository_name("_single"), "_single");
    }

    #[test]
    fn namespace_prefix() {
        assert_eq!(to_platform_name("sling:resourceType"), "_sling_resourceType");
        assert_eq!(to_repository_name("_sling_resourceType"), "sling:resourceType");
        assert_eq!(to_platform_name("a:b:c"), "_a_b%3Ac");
        assert_eq!(to_repository_name("_a_b%3Ac"), "a:b:c");
    }

    #[test]
    fn underscored_prefix_is_not_a_namespace() {
        assert_eq!(to_platform_name("my_ns:x"), "_my_ns%3Ax");
        assert_eq!(to_repository_name("_my_ns%3Ax"), "my_ns:x");
    }

    #[test]
    fn reserved_characters_escaped() {
        assert_eq!(to_platform_name("a*b"), "a%2Ab");
        assert_eq!(to_platform_name("100%"), "100%25");
        assert_eq!(to_repository_name("100%25"), "100%");
        assert_eq!(to_platform_name("tab\there"), "tab%09here");
    }

    #[test]
    fn malformed_escape_kept_literally() {
        assert_eq!(to_repository_name("50%"), "50%");
        assert_eq!(to_repository_name("a%zzb"), "a%zzb");
    }

    #[test]
    fn path_mapping() {
        assert_eq!(to_platform_path("/"), "/");
        assert_eq!(
            to_platform_path("/content/page/jcr:content"),
            "/content/page/_jcr_content"
        );
        assert_eq!(
            to_repository_path("/content/page/_jcr_content"),
            "/content/page/jcr:content"
        );
    }

    proptest! {
        #[test]
        fn platform_name_is_inverted(name in "[a-z_:%*?<>|\\\\\"\\. ]{1,12}") {
            let platform = to_platform_name(&name);
            prop_assert!(!platform.contains(':'));
            prop_assert!(!platform.contains('/'));
            prop_assert_eq!(to_repository_name(&platform), name);
        }
    }
}
