//! Typed property values in JCR document view notation.
//!
//! Attribute values carry an optional type hint and may be multi-valued:
//!
//! ```text
//! plain text          -> String
//! {Boolean}true       -> Boolean
//! {Long}42            -> Long
//! [a,b\,c]            -> Array of String ("a", "b,c")
//! {Date}[2020-01-01]  -> Array of Date
//! ```

use serde::Serialize;

/// A single property value read from a descriptor.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Boolean(bool),
    Long(i64),
    Double(f64),
    Decimal(String),
    Date(String),
    Name(String),
    Path(String),
    Reference(String),
    WeakReference(String),
    Uri(String),
    Binary(String),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Parse a raw attribute value.
    pub fn parse(raw: &str) -> Self {
        let (hint, body) = split_type_hint(raw);

        if body.len() >= 2 && body.starts_with('[') && body.ends_with(']') {
            let inner = &body[1..body.len() - 1];
            let items = if inner.is_empty() {
                Vec::new()
            } else {
                split_unescaped(inner)
                    .iter()
                    .map(|item| typed(hint, &unescape(item)))
                    .collect()
            };
            return PropertyValue::Array(items);
        }

        typed(hint, &unescape(body))
    }

    /// The value as a string slice, for single-valued textual kinds.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s)
            | PropertyValue::Decimal(s)
            | PropertyValue::Date(s)
            | PropertyValue::Name(s)
            | PropertyValue::Path(s)
            | PropertyValue::Reference(s)
            | PropertyValue::WeakReference(s)
            | PropertyValue::Uri(s)
            | PropertyValue::Binary(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for multi-valued properties.
    pub fn is_array(&self) -> bool {
        matches!(self, PropertyValue::Array(_))
    }
}

fn split_type_hint(raw: &str) -> (Option<&str>, &str) {
    if let Some(rest) = raw.strip_prefix('{') {
        if let Some(end) = rest.find('}') {
            return (Some(&rest[..end]), &rest[end + 1..]);
        }
    }
    (None, raw)
}

fn split_unescaped(s: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ',' => items.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    items.push(current);
    items
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn typed(hint: Option<&str>, value: &str) -> PropertyValue {
    let owned = || value.to_string();
    match hint {
        Some("Boolean") => match value.to_ascii_lowercase().as_str() {
            "true" => PropertyValue::Boolean(true),
            "false" => PropertyValue::Boolean(false),
            _ => PropertyValue::String(owned()),
        },
        Some("Long") => value
            .parse()
            .map(PropertyValue::Long)
            .unwrap_or_else(|_| PropertyValue::String(owned())),
        Some("Double") => value
            .parse()
            .map(PropertyValue::Double)
            .unwrap_or_else(|_| PropertyValue::String(owned())),
        Some("Decimal") => PropertyValue::Decimal(owned()),
        Some("Date") => PropertyValue::Date(owned()),
        Some("Name") => PropertyValue::Name(owned()),
        Some("Path") => PropertyValue::Path(owned()),
        Some("Reference") => PropertyValue::Reference(owned()),
        Some("WeakReference") => PropertyValue::WeakReference(owned()),
        Some("URI") => PropertyValue::Uri(owned()),
        Some("Binary") => PropertyValue::Binary(owned()),
        _ => PropertyValue::String(owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string() {
        assert_eq!(
            PropertyValue::parse("hello"),
            PropertyValue::String("hello".into())
        );
    }

    #[test]
    fn typed_scalars() {
        assert_eq!(PropertyValue::parse("{Boolean}true"), PropertyValue::Boolean(true));
        assert_eq!(PropertyValue::parse("{Long}-7"), PropertyValue::Long(-7));
        assert_eq!(PropertyValue::parse("{Double}1.5"), PropertyValue::Double(1.5));
        assert_eq!(
            PropertyValue::parse("{Date}2020-01-01T00:00:00.000Z"),
            PropertyValue::Date("2020-01-01T00:00:00.000Z".into())
        );
        assert_eq!(
            PropertyValue::parse("{Name}nt:unstructured"),
            PropertyValue::Name("nt:unstructured".into())
        );
    }

    #[test]
    fn bad_typed_value_degrades_to_string() {
        assert_eq!(
            PropertyValue::parse("{Long}many"),
            PropertyValue::String("many".into())
        );
    }

    #[test]
    fn arrays() {
        assert_eq!(
            PropertyValue::parse("[a,b\\,c]"),
            PropertyValue::Array(vec![
                PropertyValue::String("a".into()),
                PropertyValue::String("b,c".into()),
            ])
        );
        assert_eq!(
            PropertyValue::parse("{Long}[1,2]"),
            PropertyValue::Array(vec![PropertyValue::Long(1), PropertyValue::Long(2)])
        );
        assert_eq!(PropertyValue::parse("[]"), PropertyValue::Array(vec![]));
    }

    #[test]
    fn escaped_brackets_are_literal() {
        assert_eq!(
            PropertyValue::parse("\\[not an array]"),
            PropertyValue::String("[not an array]".into())
        );
        assert_eq!(
            PropertyValue::parse("\\{Long}1"),
            PropertyValue::String("{Long}1".into())
        );
    }

    #[test]
    fn as_str_only_for_text() {
        assert_eq!(PropertyValue::parse("x").as_str(), Some("x"));
        assert_eq!(PropertyValue::parse("{Boolean}false").as_str(), None);
        assert!(PropertyValue::parse("[x]").is_array());
    }
}
