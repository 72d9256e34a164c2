//! Owned XML element trees for embedded vector graphics.
//!
//! An embedded SVG fragment is parsed once into an [`XmlElement`] so that it
//! can be rewritten (identifier masking) and later serialized into the output
//! document without re-parsing.

use indexmap::IndexMap;
use svg::{
    Node,
    node::{self, element::Element},
};

/// A child of an [`XmlElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An owned XML element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child element (builder style).
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut IndexMap<String, String> {
        &mut self.attributes
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [XmlNode] {
        &mut self.children
    }

    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Iterates over the direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Calls `visit` on this element and every descendant element, each exactly once.
    pub fn walk(&self, visit: &mut impl FnMut(&XmlElement)) {
        visit(self);
        for child in self.child_elements() {
            child.walk(visit);
        }
    }

    /// Mutable variant of [`XmlElement::walk`].
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut XmlElement)) {
        visit(self);
        for child in &mut self.children {
            if let XmlNode::Element(element) = child {
                element.walk_mut(visit);
            }
        }
    }

    /// Converts the tree into an `svg` crate node for serialization.
    pub fn to_svg(&self) -> Element {
        let mut element = Element::new(self.name.clone());
        for (name, value) in &self.attributes {
            element.assign(name.clone(), value.clone());
        }
        for child in &self.children {
            match child {
                XmlNode::Element(child) => {
                    element.append(Box::new(child.to_svg()) as Box<dyn svg::Node>)
                }
                XmlNode::Text(text) => {
                    element.append(Box::new(node::Text::new(text.clone())) as Box<dyn svg::Node>)
                }
            }
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        XmlElement::new("svg")
            .with_attribute("width", "10")
            .with_child(
                XmlElement::new("defs")
                    .with_child(XmlElement::new("linearGradient").with_attribute("id", "g")),
            )
            .with_child(XmlElement::new("rect").with_attribute("fill", "url(#g)"))
    }

    #[test]
    fn test_walk_visits_every_element_once() {
        let mut names = Vec::new();
        sample().walk(&mut |element| names.push(element.name().to_string()));
        assert_eq!(names, ["svg", "defs", "linearGradient", "rect"]);
    }

    #[test]
    fn test_walk_mut_rewrites() {
        let mut root = sample();
        root.walk_mut(&mut |element| element.set_attribute("data-seen", "1"));

        let mut seen = 0;
        root.walk(&mut |element| {
            if element.attribute("data-seen") == Some("1") {
                seen += 1;
            }
        });
        assert_eq!(seen, 4);
    }

    #[test]
    fn test_to_svg_preserves_attributes_and_text() {
        let mut root = XmlElement::new("text").with_attribute("x", "5");
        root.push(XmlNode::Text("label".to_string()));
        let rendered = root.to_svg().to_string();
        assert!(rendered.starts_with("<text"));
        assert!(rendered.contains("x=\"5\""));
        assert!(rendered.contains("label"));
    }
}
