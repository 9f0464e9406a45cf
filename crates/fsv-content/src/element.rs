//! The parsed descriptor tree.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::PropertyValue;

/// Property naming the primary node type.
pub const PRIMARY_TYPE: &str = "jcr:primaryType";

/// Property naming the resource type used for rendering.
pub const RESOURCE_TYPE: &str = "sling:resourceType";

/// One node of a descriptor: properties plus children in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContentElement {
    name: String,
    properties: BTreeMap<String, PropertyValue>,
    children: Vec<ContentElement>,
}

impl ContentElement {
    /// Create an element with no properties and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Element name; empty for a descriptor root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All properties, sorted by name.
    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    /// A single property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Set (or replace) a property.
    pub fn set_property(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    /// `sling:resourceType`, falling back to `jcr:primaryType`.
    pub fn resource_type(&self) -> Option<&str> {
        self.property(RESOURCE_TYPE)
            .or_else(|| self.property(PRIMARY_TYPE))
            .and_then(PropertyValue::as_str)
    }

    /// Direct children as `(name, element)` pairs in declaration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ContentElement)> {
        self.children.iter().map(|c| (c.name.as_str(), c))
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// A direct child by name.
    pub fn child(&self, name: &str) -> Option<&ContentElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Append a child. A child with the same name is replaced in place, so
    /// its original declaration position is kept.
    pub fn add_child(&mut self, child: ContentElement) {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(existing) => *existing = child,
            None => self.children.push(child),
        }
    }

    /// Descend along a `/`-separated relative path. An empty path is `self`.
    pub fn get(&self, relative_path: &str) -> Option<&ContentElement> {
        relative_path
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |element, segment| element.child(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContentElement {
        let mut root = ContentElement::new("");
        root.set_property(PRIMARY_TYPE, PropertyValue::String("cq:Page".into()));
        let mut content = ContentElement::new("jcr:content");
        content.set_property(RESOURCE_TYPE, PropertyValue::String("site/page".into()));
        content.add_child(ContentElement::new("par"));
        root.add_child(content);
        root.add_child(ContentElement::new("child"));
        root
    }

    #[test]
    fn navigates_relative_paths() {
        let root = sample();
        assert_eq!(root.get("").unwrap().name(), "");
        assert_eq!(root.get("jcr:content/par").unwrap().name(), "par");
        assert!(root.get("jcr:content/missing").is_none());
    }

    #[test]
    fn children_keep_declaration_order() {
        let root = sample();
        let names: Vec<&str> = root.children().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["jcr:content", "child"]);
    }

    #[test]
    fn duplicate_child_replaced_in_place() {
        let mut root = sample();
        let mut again = ContentElement::new("jcr:content");
        again.set_property("title", PropertyValue::String("second".into()));
        root.add_child(again);

        let names: Vec<&str> = root.children().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["jcr:content", "child"]);
        assert!(root.get("jcr:content").unwrap().property("title").is_some());
    }

    #[test]
    fn resource_type_prefers_sling() {
        let root = sample();
        assert_eq!(root.resource_type(), Some("cq:Page"));
        assert_eq!(
            root.get("jcr:content").unwrap().resource_type(),
            Some("site/page")
        );
    }
}
