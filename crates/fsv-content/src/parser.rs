//! JCR document view XML parser.
//!
//! The root element (usually `jcr:root`) becomes an unnamed
//! [`ContentElement`]; nested elements become children in document order and
//! attributes become properties. Names are ISO 9075 decoded (`_x0020_` is a
//! space) and namespace declarations are dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::element::ContentElement;
use crate::error::{ContentError, ContentResult};
use crate::value::PropertyValue;

/// Parse a descriptor document into its root element.
pub fn parse_jcr_xml(xml: &str) -> ContentResult<ContentElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<ContentElement> = Vec::new();
    let mut root: Option<ContentElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| ContentError::Xml {
            position,
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                let element = element_from(&start, stack.is_empty(), position)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = element_from(&start, stack.is_empty(), position)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| ContentError::Xml {
                    position,
                    reason: "unexpected closing tag".into(),
                })?;
                attach(&mut stack, &mut root, element);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ContentError::Xml {
            position: reader.buffer_position() as u64,
            reason: "unclosed element at end of document".into(),
        });
    }
    root.ok_or(ContentError::MissingRoot)
}

fn attach(stack: &mut [ContentElement], root: &mut Option<ContentElement>, element: ContentElement) {
    match stack.last_mut() {
        Some(parent) => parent.add_child(element),
        None => {
            // Only the first top-level element counts.
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn element_from(start: &BytesStart<'_>, is_root: bool, position: u64) -> ContentResult<ContentElement> {
    let xml_err = |reason: String| ContentError::Xml { position, reason };

    let name = if is_root {
        String::new()
    } else {
        let raw = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| xml_err(e.to_string()))?
            .to_string();
        decode_iso9075(&raw)
    };

    let mut element = ContentElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_err(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(|e| xml_err(e.to_string()))?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr.unescape_value().map_err(|e| xml_err(e.to_string()))?;
        element.set_property(decode_iso9075(key), PropertyValue::parse(&value));
    }
    Ok(element)
}

/// Decode `_xHHHH_` escapes in an XML name.
pub fn decode_iso9075(name: &str) -> String {
    if !name.contains("_x") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(idx) = rest.find("_x") {
        out.push_str(&rest[..idx]);
        let candidate = &rest[idx..];
        let decoded = candidate
            .get(2..6)
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &candidate[7..];
            }
            None => {
                out.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<jcr:root xmlns:jcr="http://www.jcp.org/jcr/1.0" xmlns:sling="http://sling.apache.org/jcr/sling/1.0"
    jcr:primaryType="cq:Page">
    <jcr:content jcr:primaryType="nt:unstructured" sling:resourceType="site/page" jcr:title="Home &amp; Away">
        <par jcr:primaryType="nt:unstructured">
            <text jcr:primaryType="nt:unstructured" count="{Long}3"/>
        </par>
    </jcr:content>
    <my_x0020_child jcr:primaryType="nt:folder"/>
</jcr:root>
"#;

    #[test]
    fn parses_nested_elements() {
        let root = parse_jcr_xml(PAGE).unwrap();
        assert_eq!(root.name(), "");
        assert_eq!(root.resource_type(), Some("cq:Page"));
        assert!(root.property("xmlns:jcr").is_none());

        let text = root.get("jcr:content/par/text").unwrap();
        assert_eq!(text.property("count"), Some(&PropertyValue::Long(3)));
    }

    #[test]
    fn unescapes_attribute_values() {
        let root = parse_jcr_xml(PAGE).unwrap();
        let content = root.get("jcr:content").unwrap();
        assert_eq!(
            content.property("jcr:title"),
            Some(&PropertyValue::String("Home & Away".into()))
        );
    }

    #[test]
    fn decodes_element_names() {
        let root = parse_jcr_xml(PAGE).unwrap();
        let names: Vec<&str> = root.children().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["jcr:content", "my child"]);
    }

    #[test]
    fn iso9075_edge_cases() {
        assert_eq!(decode_iso9075("plain"), "plain");
        assert_eq!(decode_iso9075("_x0031_23"), "123");
        assert_eq!(decode_iso9075("a_xZZZZ_b"), "a_xZZZZ_b");
        assert_eq!(decode_iso9075("tail_x"), "tail_x");
    }

    #[test]
    fn rejects_malformed_xml() {
        let result = parse_jcr_xml("<jcr:root><a></b></jcr:root>");
        assert!(matches!(result, Err(ContentError::Xml { .. })));
    }

    #[test]
    fn rejects_empty_document() {
        let result = parse_jcr_xml("<?xml version=\"1.0\"?>");
        assert!(matches!(result, Err(ContentError::MissingRoot)));
    }
}
