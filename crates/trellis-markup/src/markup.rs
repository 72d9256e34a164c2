//! Read-only access to GraphML markup.
//!
//! The document is parsed with `roxmltree`; elements are then handed to the
//! element kinds as [`Markup`] views. Attribute readers never fail: a value
//! that cannot be read is replaced by a default and reported through the
//! [`DiagnosticCollector`].

use std::str::FromStr;

use indexmap::IndexMap;
use log::debug;
use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;
use trellis_core::{color::Color, identifier::Id};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
};

/// Namespace URIs understood by the built-in dialects.
pub mod ns {
    pub const GRAPHML: &str = "http://graphml.graphdrawing.org/xmlns";
    pub const YWORKS: &str = "http://www.yworks.com/xml/graphml";
    pub const YED: &str = "http://www.yworks.com/xml/yed/3";
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
    pub const SVG: &str = "http://www.w3.org/2000/svg";
}

/// Failure to obtain a document tree at all.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("malformed markup: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("document root is <{0}>, expected <graphml>")]
    NotGraphml(String),
}

/// Parses a GraphML document.
///
/// DTDs are allowed because exported yEd files occasionally carry one.
pub fn parse_document(source: &str) -> Result<Document<'_>, MarkupError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let document = Document::parse_with_options(source, options)?;

    let root = document.root_element();
    if root.tag_name().name() != "graphml" {
        return Err(MarkupError::NotGraphml(root.tag_name().name().to_string()));
    }
    Ok(document)
}

/// Returns true if `node` is the element `{namespace}name`.
pub fn is_element(node: Node<'_, '_>, namespace: &str, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(namespace)
}

/// The first child element named `{namespace}name`.
pub fn child<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.children().find(|c| is_element(*c, namespace, name))
}

/// All child elements named `{namespace}name`, in document order.
pub fn children<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &'a str,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |c| is_element(*c, namespace, name))
}

/// Concatenation of the direct text children, with trailing whitespace removed.
pub fn text_content(node: Node<'_, '_>) -> String {
    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    text.trim_end().to_string()
}

/// One GraphML `<key>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub id: String,
    pub domain: String,
    pub attr_name: Option<String>,
    pub yfiles_type: Option<String>,
}

/// The document's `<key>` declarations, by key id.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    keys: IndexMap<String, KeyDefinition>,
}

impl KeyTable {
    pub fn from_document(document: &Document<'_>) -> Self {
        let mut keys = IndexMap::new();
        for key in children(document.root_element(), ns::GRAPHML, "key") {
            let Some(id) = key.attribute("id") else {
                continue;
            };
            keys.insert(
                id.to_string(),
                KeyDefinition {
                    id: id.to_string(),
                    domain: key.attribute("for").unwrap_or("all").to_string(),
                    attr_name: key.attribute("attr.name").map(str::to_string),
                    yfiles_type: key.attribute("yfiles.type").map(str::to_string),
                },
            );
        }
        debug!(count = keys.len(); "GraphML keys declared");
        Self { keys }
    }

    pub fn get(&self, id: &str) -> Option<&KeyDefinition> {
        self.keys.get(id)
    }

    /// Human readable name of a `<data>` key: its `attr.name` or the key id.
    pub fn display_name<'k>(&'k self, id: &'k str) -> &'k str {
        self.get(id)
            .and_then(|key| key.attr_name.as_deref())
            .unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The markup handed to an element kind.
///
/// `element` is the GraphML-level `<node>`, `<edge>` or `<hyperedge>`;
/// `realizer` is the dialect element found under one of its `<data>`
/// children (for instance `<y:ShapeNode>`), if any.
#[derive(Debug, Clone, Copy)]
pub struct Markup<'a, 'input> {
    element: Node<'a, 'input>,
    realizer: Option<Node<'a, 'input>>,
    keys: Option<&'a KeyTable>,
}

impl<'a, 'input> Markup<'a, 'input> {
    pub fn new(element: Node<'a, 'input>) -> Self {
        Self {
            element,
            realizer: None,
            keys: None,
        }
    }

    pub fn with_realizer(mut self, realizer: Node<'a, 'input>) -> Self {
        self.realizer = Some(realizer);
        self
    }

    pub fn with_keys(mut self, keys: &'a KeyTable) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn element(&self) -> Node<'a, 'input> {
        self.element
    }

    pub fn realizer(&self) -> Option<Node<'a, 'input>> {
        self.realizer
    }

    pub fn keys(&self) -> Option<&'a KeyTable> {
        self.keys
    }

    /// The `id` attribute of the GraphML element.
    pub fn id(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn span(&self) -> Span {
        Span::of(self.element)
    }

    /// Reader over the realizer, falling back to the GraphML element.
    pub fn reader(&self) -> AttributeReader<'a, 'input> {
        AttributeReader::new(self.realizer.unwrap_or(self.element))
    }
}

/// Reads typed attribute values off one element, defaulting on failure.
#[derive(Debug, Clone, Copy)]
pub struct AttributeReader<'a, 'input> {
    node: Node<'a, 'input>,
    element: Option<Id>,
}

impl<'a, 'input> AttributeReader<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self {
            node,
            element: None,
        }
    }

    /// Attaches the owning element's identifier to emitted diagnostics.
    pub fn for_element(mut self, element: Id) -> Self {
        self.element = Some(element);
        self
    }

    pub fn node(&self) -> Node<'a, 'input> {
        self.node
    }

    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.node.attribute(name)
    }

    /// A numeric attribute that must be present; 0 with a diagnostic otherwise.
    pub fn required_f32(&self, name: &str, collector: &mut DiagnosticCollector) -> f32 {
        match self.node.attribute(name) {
            Some(raw) => self.parse_f32(name, raw, 0.0, collector),
            None => {
                collector.emit(
                    self.diagnostic(format!(
                        "<{}> is missing attribute `{name}`",
                        self.node.tag_name().name()
                    ))
                    .with_code(ErrorCode::E101)
                    .with_help("0 is used instead"),
                );
                0.0
            }
        }
    }

    /// An optional numeric attribute.
    pub fn f32_or(&self, name: &str, default: f32, collector: &mut DiagnosticCollector) -> f32 {
        match self.node.attribute(name) {
            Some(raw) => self.parse_f32(name, raw, default, collector),
            None => default,
        }
    }

    /// An optional index or count; fractional, negative and other values are reported.
    pub fn usize_or(&self, name: &str, default: usize, collector: &mut DiagnosticCollector) -> usize {
        let Some(raw) = self.node.attribute(name) else {
            return default;
        };
        match raw.trim().parse::<usize>() {
            Ok(value) => value,
            Err(_) => {
                collector.emit(
                    self.diagnostic(format!("`{name}` is not a non-negative integer: `{raw}`"))
                        .with_code(ErrorCode::E100)
                        .with_help(format!("{default} is used instead")),
                );
                default
            }
        }
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        match self.node.attribute(name) {
            Some(raw) => raw.trim().eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    /// A color attribute; unparsable colors are reported and skipped.
    pub fn color(&self, name: &str, collector: &mut DiagnosticCollector) -> Option<Color> {
        let raw = self.node.attribute(name)?;
        match Color::new(raw) {
            Ok(color) => Some(color),
            Err(err) => {
                collector.emit(
                    self.diagnostic(format!("invalid color `{raw}` in `{name}`: {err}"))
                        .with_code(ErrorCode::E103),
                );
                None
            }
        }
    }

    /// An enumerated attribute parsed with `FromStr`, `default` when absent or unknown.
    pub fn parse_or<T>(&self, name: &str, default: T, collector: &mut DiagnosticCollector) -> T
    where
        T: FromStr<Err = String>,
    {
        let Some(raw) = self.node.attribute(name) else {
            return default;
        };
        match raw.trim().parse() {
            Ok(value) => value,
            Err(err) => {
                collector.emit(self.diagnostic(err).with_code(ErrorCode::E103));
                default
            }
        }
    }

    /// A warning located at this element.
    pub fn diagnostic(&self, message: impl Into<String>) -> Diagnostic {
        let diagnostic = Diagnostic::warning(message).with_span(Span::of(self.node), "here");
        match self.element {
            Some(id) => diagnostic.with_element(id),
            None => diagnostic,
        }
    }

    fn parse_f32(
        &self,
        name: &str,
        raw: &str,
        default: f32,
        collector: &mut DiagnosticCollector,
    ) -> f32 {
        match raw.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                collector.emit(
                    self.diagnostic(format!("`{name}` is not a number: `{raw}`"))
                        .with_code(ErrorCode::E100)
                        .with_help(format!("{default} is used instead")),
                );
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const DOC: &str = r##"<?xml version="1.0"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:y="http://www.yworks.com/xml/graphml">
  <key id="d0" for="node" attr.name="description" attr.type="string"/>
  <key id="d6" for="node" yfiles.type="nodegraphics"/>
  <graph id="G" edgedefault="directed">
    <node id="n0">
      <data key="d6">
        <y:ShapeNode>
          <y:Geometry x="1.5" y="oops" width="30"/>
          <y:Fill color="#FFCC00" transparent="false"/>
          <y:NodeLabel>Line one
Line two<y:LabelModel/></y:NodeLabel>
        </y:ShapeNode>
      </data>
    </node>
  </graph>
</graphml>"##;

    fn shape_node<'a, 'i>(doc: &'a Document<'i>) -> Node<'a, 'i> {
        doc.descendants()
            .find(|n| is_element(*n, ns::YWORKS, "ShapeNode"))
            .unwrap()
    }

    #[test]
    fn test_parse_document_rejects_other_roots() {
        let err = parse_document("<svg/>").unwrap_err();
        assert!(matches!(err, MarkupError::NotGraphml(name) if name == "svg"));
        assert!(matches!(parse_document("<graphml"), Err(MarkupError::Xml(_))));
    }

    #[test]
    fn test_key_table() {
        let doc = parse_document(DOC).unwrap();
        let keys = KeyTable::from_document(&doc);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.display_name("d0"), "description");
        assert_eq!(keys.display_name("d6"), "d6");
        assert_eq!(keys.get("d6").unwrap().yfiles_type.as_deref(), Some("nodegraphics"));
    }

    #[test]
    fn test_reader_defaults_and_diagnostics() {
        let doc = parse_document(DOC).unwrap();
        let geometry = child(shape_node(&doc), ns::YWORKS, "Geometry").unwrap();
        let reader = AttributeReader::new(geometry).for_element(Id::new("n0"));
        let mut collector = DiagnosticCollector::new();

        assert_eq!(reader.required_f32("x", &mut collector), 1.5);
        assert_eq!(reader.required_f32("y", &mut collector), 0.0);
        assert_eq!(reader.required_f32("height", &mut collector), 0.0);
        assert_eq!(reader.f32_or("width", 5.0, &mut collector), 30.0);

        let parsed = collector.finish(());
        let codes: Vec<_> = parsed.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(codes, [Some(ErrorCode::E100), Some(ErrorCode::E101)]);
        assert!(
            parsed
                .diagnostics()
                .iter()
                .all(|d| d.element() == Some(Id::new("n0")))
        );
    }

    #[test]
    fn test_reader_color_and_bool() {
        let doc = parse_document(DOC).unwrap();
        let fill = child(shape_node(&doc), ns::YWORKS, "Fill").unwrap();
        let reader = AttributeReader::new(fill);
        let mut collector = DiagnosticCollector::new();

        assert!(reader.color("color", &mut collector).is_some());
        assert!(reader.color("color2", &mut collector).is_none());
        assert!(!reader.bool_or("transparent", true));
        assert!(reader.bool_or("missing", true));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_reader_integers() {
        let doc = roxmltree::Document::parse(r#"<g a="2" b=" 3 " c="1.7" d="-1"/>"#).unwrap();
        let reader = AttributeReader::new(doc.root_element());
        let mut collector = DiagnosticCollector::new();

        assert_eq!(reader.usize_or("a", 0, &mut collector), 2);
        assert_eq!(reader.usize_or("b", 0, &mut collector), 3);
        assert_eq!(reader.usize_or("missing", 4, &mut collector), 4);
        assert!(collector.is_empty());

        assert_eq!(reader.usize_or("c", 0, &mut collector), 0);
        assert_eq!(reader.usize_or("d", 5, &mut collector), 5);
        let parsed = collector.finish(());
        assert_eq!(parsed.diagnostics().len(), 2);
        assert!(parsed.diagnostics().iter().all(|d| d.code() == Some(ErrorCode::E100)));
    }

    #[test]
    fn test_text_content_skips_child_elements() {
        let doc = parse_document(DOC).unwrap();
        let label = child(shape_node(&doc), ns::YWORKS, "NodeLabel").unwrap();
        assert_eq!(text_content(label), "Line one\nLine two");
    }

    #[test]
    fn test_markup_accessors() {
        let doc = parse_document(DOC).unwrap();
        let node = doc
            .descendants()
            .find(|n| is_element(*n, ns::GRAPHML, "node"))
            .unwrap();
        let markup = Markup::new(node).with_realizer(shape_node(&doc));
        assert_eq!(markup.id(), Some("n0"));
        assert_eq!(markup.reader().node().tag_name().name(), "ShapeNode");
        assert!(DOC[markup.span().start()..].starts_with("<node"));
    }

    proptest! {
        #[test]
        fn prop_reader_reads_back_finite_numbers(value in proptest::num::f32::NORMAL | proptest::num::f32::ZERO) {
            let source = format!(r#"<g v="{value}"/>"#);
            let doc = roxmltree::Document::parse(&source).unwrap();
            let reader = AttributeReader::new(doc.root_element());
            let mut collector = DiagnosticCollector::new();

            prop_assert_eq!(reader.f32_or("v", -1.0, &mut collector), value);
            prop_assert!(collector.is_empty());
        }

        #[test]
        fn prop_reader_rejects_words(word in "[a-z]{1,8}") {
            let source = format!(r#"<g v="{word}"/>"#);
            let doc = roxmltree::Document::parse(&source).unwrap();
            let reader = AttributeReader::new(doc.root_element());
            let mut collector = DiagnosticCollector::new();

            prop_assert_eq!(reader.f32_or("v", 7.0, &mut collector), 7.0);
            prop_assert_eq!(collector.len(), 1);
        }
    }
}
