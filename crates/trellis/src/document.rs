//! Assembly of a GraphML document into elements.
//!
//! Every `<node>`, `<edge>` and `<hyperedge>` is dispatched, in document
//! order, to the kind that handles its realizer: the first element child of
//! one of its `<data>` children whose namespace is active in the registry.
//! Elements without a realizer fall back to the plain GraphML kinds.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace, warn};
use roxmltree::Node;

use trellis_core::{
    draw::RenderLayer,
    geometry::{Bounds, Geometry},
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, KeyTable, Markup, ResourceTable, Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, MarkupError, ns},
};

use crate::{element::Element, registry::NamespaceRegistry};

const STRUCTURAL: [&str; 3] = ["node", "edge", "hyperedge"];

/// One element of a [`Document`] with its place in the graph hierarchy.
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    element: Box<dyn Element>,
    parent: Option<Id>,
    span: Span,
}

impl DocumentEntry {
    pub fn element(&self) -> &dyn Element {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> &mut dyn Element {
        self.element.as_mut()
    }

    /// The node whose nested `<graph>` contains this element.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// The parsed elements of one GraphML document, in document order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: IndexMap<Id, DocumentEntry>,
    resources: ResourceTable,
}

impl Document {
    /// Parses `source` with the kinds active in `registry`.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkupError`] if the source is not XML or not GraphML.
    /// Defects of individual elements are reported as diagnostics instead.
    pub fn parse(
        source: &str,
        registry: &NamespaceRegistry,
    ) -> Result<Parsed<Self>, MarkupError> {
        let xml = markup::parse_document(source)?;
        let mut collector = DiagnosticCollector::new();

        let resources = collector.absorb(ResourceTable::from_document(&xml));
        let keys = KeyTable::from_document(&xml);
        debug!(resources = resources.len(), keys = keys.len(); "Document tables read");

        let mut document = Self {
            entries: IndexMap::new(),
            resources,
        };
        let structural: Vec<_> = xml
            .descendants()
            .filter(|node| {
                STRUCTURAL
                    .iter()
                    .any(|name| markup::is_element(*node, ns::GRAPHML, name))
            })
            .collect();
        let named: HashSet<&str> = structural
            .iter()
            .filter_map(|node| node.attribute("id"))
            .collect();
        for (idx, node) in structural.into_iter().enumerate() {
            let id = node
                .attribute("id")
                .map_or_else(|| anonymous_id(idx, &named), Id::new);
            if document.entries.contains_key(&id) {
                collector.emit(
                    AttributeReader::new(node)
                        .for_element(id)
                        .diagnostic(format!("duplicate element id `{id}`"))
                        .with_help("only the first element with this id is kept"),
                );
                continue;
            }

            let Some(element) = dispatch(node, id, &keys, registry, &mut collector) else {
                continue;
            };
            trace!(id:% = id, kind = element.kind(); "Element parsed");
            document.entries.insert(
                id,
                DocumentEntry {
                    element,
                    parent: parent_node(node),
                    span: Span::of(node),
                },
            );
        }

        let anchors = document.anchors();
        for entry in document.entries.values_mut() {
            entry.element.attach(&anchors);
        }

        debug!(elements = document.len(); "Document assembled");
        Ok(collector.finish(document))
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Id) -> Option<&DocumentEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut DocumentEntry> {
        self.entries.get_mut(&id)
    }

    /// Iterates over all entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.entries.values()
    }

    /// Iterates over all elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &dyn Element> {
        self.entries.values().map(DocumentEntry::element)
    }

    /// Direct children of `parent`, or the top-level elements for `None`.
    pub fn children(&self, parent: Option<Id>) -> impl Iterator<Item = &dyn Element> {
        self.entries
            .values()
            .filter(move |entry| entry.parent == parent)
            .map(DocumentEntry::element)
    }

    /// Current bounds of every node-like element, used to attach edges.
    pub fn anchors(&self) -> IndexMap<Id, Geometry> {
        self.elements()
            .filter(|element| element.layer() != RenderLayer::Edge)
            .map(|element| (element.id(), element.bounds()))
            .collect()
    }

    /// Extent of all node bounds and label boxes, or None for an empty drawing.
    pub fn bounds(&self) -> Option<Bounds> {
        self.elements()
            .filter(|element| element.layer() != RenderLayer::Edge)
            .flat_map(|element| {
                std::iter::once(element.bounds())
                    .chain(element.labels().iter().map(|label| label.bounds()))
            })
            .filter(|geometry| !geometry.is_zero())
            .map(Geometry::to_bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Moves `id` and everything nested inside it.
    ///
    /// Returns false if no element has that id.
    pub fn translate_subtree(&mut self, id: Id, dx: f32, dy: f32) -> bool {
        if !self.entries.contains_key(&id) {
            return false;
        }
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(entry) = self.entries.get_mut(&current) {
                entry.element.translate(dx, dy);
            }
            pending.extend(
                self.entries
                    .iter()
                    .filter(|(_, entry)| entry.parent == Some(current))
                    .map(|(child, _)| *child),
            );
        }
        true
    }
}

/// Identifier for the unnamed element at `idx` that no named element uses.
fn anonymous_id(idx: usize, named: &HashSet<&str>) -> Id {
    let base = Id::from_anonymous(idx).to_string();
    let mut candidate = base.clone();
    let mut attempt = 0usize;
    while named.contains(candidate.as_str()) {
        attempt += 1;
        candidate = format!("{base}_{attempt}");
    }
    Id::new(&candidate)
}

/// Nearest enclosing `<node>`, i.e. the owner of the `<graph>` this element sits in.
fn parent_node(node: Node<'_, '_>) -> Option<Id> {
    node.ancestors()
        .skip(1)
        .find(|ancestor| markup::is_element(*ancestor, ns::GRAPHML, "node"))
        .and_then(|ancestor| ancestor.attribute("id"))
        .map(Id::new)
}

/// The dialect element attached to `node` whose namespace is active.
fn find_realizer<'a, 'input>(
    node: Node<'a, 'input>,
    registry: &NamespaceRegistry,
) -> Option<Node<'a, 'input>> {
    markup::children(node, ns::GRAPHML, "data")
        .filter_map(|data| data.first_element_child())
        .find(|candidate| {
            candidate
                .tag_name()
                .namespace()
                .is_some_and(|uri| uri != ns::GRAPHML && registry.lookup(uri).is_some())
        })
}

fn dispatch(
    node: Node<'_, '_>,
    id: Id,
    keys: &KeyTable,
    registry: &NamespaceRegistry,
    collector: &mut DiagnosticCollector,
) -> Option<Box<dyn Element>> {
    let tag = node.tag_name().name();
    let mut markup = Markup::new(node).with_keys(keys);

    let realized = find_realizer(node, registry).and_then(|realizer| {
        let uri = realizer.tag_name().namespace()?;
        let kind = realizer.tag_name().name();
        let namespace = registry.lookup(uri)?;
        match namespace.construct(kind, id) {
            Some(element) => {
                markup = markup.with_realizer(realizer);
                Some(element)
            }
            None => {
                warn!(id:% = id, kind = kind; "Unknown element kind");
                collector.emit(
                    AttributeReader::new(realizer)
                        .for_element(id)
                        .diagnostic(format!("`{kind}` is not a known kind of {uri}"))
                        .with_code(ErrorCode::E104)
                        .with_help(format!("`{id}` is read as a plain GraphML {tag}")),
                );
                None
            }
        }
    });

    let element = realized.or_else(|| {
        registry
            .lookup(ns::GRAPHML)
            .and_then(|graphml| graphml.construct(tag, id))
    });
    let Some(mut element) = element else {
        collector.emit(
            Diagnostic::warning(format!("no active dialect handles <{tag}> `{id}`"))
                .with_code(ErrorCode::E104)
                .with_element(id)
                .with_span(Span::of(node), "skipped"),
        );
        return None;
    };

    for diagnostic in element.parse_markup(markup) {
        collector.emit(diagnostic);
    }
    Some(element)
}
