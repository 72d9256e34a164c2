//! Plain GraphML kinds.
//!
//! These carry the graph structure (identities, endpoints, `<data>` values)
//! but no visual information, so they have no geometry and build to
//! [`RenderNode::Empty`]. The orchestrator falls back to them whenever an
//! element has no realizer from an installed dialect.

use std::str::FromStr;

use indexmap::IndexMap;

use trellis_core::{
    draw::{RenderLayer, RenderNode},
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, Markup,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, ns},
};

use crate::{
    element::{BuildContext, ElementKind},
    registry::Namespace,
};

/// The GraphML dialect with `node`, `edge` and `hyperedge`.
pub fn namespace() -> Namespace {
    Namespace::new(ns::GRAPHML)
        .with_kind::<GraphmlNode>("node")
        .with_kind::<GraphmlEdge>("edge")
        .with_kind::<GraphmlHyperedge>("hyperedge")
}

/// Text of the element's `<data>` children that hold plain text, by key name.
fn parse_data(markup: Markup<'_, '_>) -> IndexMap<String, String> {
    let mut data = IndexMap::new();
    for child in markup::children(markup.element(), ns::GRAPHML, "data") {
        if child.children().any(|c| c.is_element()) {
            continue;
        }
        let Some(key) = child.attribute("key") else {
            continue;
        };
        let name = match markup.keys() {
            Some(keys) => keys.display_name(key).to_string(),
            None => key.to_string(),
        };
        data.insert(name, markup::text_content(child));
    }
    data
}

/// Source and target of an edge element.
///
/// Both are structurally required; each missing one is reported and left
/// unset so the edge can still be kept.
pub(crate) fn parse_endpoints(
    markup: Markup<'_, '_>,
    id: Id,
    collector: &mut DiagnosticCollector,
) -> (Option<Id>, Option<Id>) {
    let mut endpoint = |name: &str| match markup.element().attribute(name) {
        Some(value) => Some(Id::new(value)),
        None => {
            collector.emit(
                Diagnostic::error(format!("edge `{id}` has no `{name}`"))
                    .with_code(ErrorCode::E200)
                    .with_element(id)
                    .with_span(markup.span(), "endpoint missing")
                    .with_help("the edge is kept but cannot be drawn"),
            );
            None
        }
    };
    let source = endpoint("source");
    let target = endpoint("target");
    (source, target)
}

/// A GraphML `<node>` without a realizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphmlNode {
    data: IndexMap<String, String>,
}

impl GraphmlNode {
    pub fn data(&self) -> &IndexMap<String, String> {
        &self.data
    }
}

impl ElementKind for GraphmlNode {
    fn parse(markup: Markup<'_, '_>, _id: Id) -> Parsed<Self> {
        Parsed::clean(Self {
            data: parse_data(markup),
        })
    }

    fn build(&self, _id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        Parsed::clean(RenderNode::Empty)
    }
}

/// A GraphML `<edge>` without a realizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphmlEdge {
    source: Option<Id>,
    target: Option<Id>,
    directed: bool,
    data: IndexMap<String, String>,
}

impl GraphmlEdge {
    pub fn source(&self) -> Option<Id> {
        self.source
    }

    pub fn target(&self) -> Option<Id> {
        self.target
    }

    /// The edge's `directed` attribute, else its graph's `edgedefault`.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn data(&self) -> &IndexMap<String, String> {
        &self.data
    }
}

impl ElementKind for GraphmlEdge {
    const LAYER: RenderLayer = RenderLayer::Edge;

    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let (source, target) = parse_endpoints(markup, id, &mut collector);

        let element = markup.element();
        let directed = match element.attribute("directed") {
            Some(value) => value == "true",
            None => element
                .ancestors()
                .find(|n| markup::is_element(*n, ns::GRAPHML, "graph"))
                .and_then(|graph| graph.attribute("edgedefault"))
                .is_none_or(|default| default == "directed"),
        };

        collector.finish(Self {
            source,
            target,
            directed,
            data: parse_data(markup),
        })
    }

    fn build(&self, _id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        Parsed::clean(RenderNode::Empty)
    }
}

/// Direction of a hyperedge endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndpointType {
    In,
    Out,
    #[default]
    Undirected,
}

impl FromStr for EndpointType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "undir" => Ok(Self::Undirected),
            _ => Err(format!(
                "invalid endpoint type `{s}`, valid values: in, out, undir"
            )),
        }
    }
}

/// One `<endpoint>` of a hyperedge.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub node: Id,
    pub port: Option<String>,
    pub kind: EndpointType,
}

/// A GraphML `<hyperedge>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphmlHyperedge {
    endpoints: Vec<Endpoint>,
    data: IndexMap<String, String>,
}

impl GraphmlHyperedge {
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn data(&self) -> &IndexMap<String, String> {
        &self.data
    }
}

impl ElementKind for GraphmlHyperedge {
    const LAYER: RenderLayer = RenderLayer::Edge;

    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let mut endpoints = Vec::new();

        for endpoint in markup::children(markup.element(), ns::GRAPHML, "endpoint") {
            let reader = AttributeReader::new(endpoint).for_element(id);
            let Some(node) = reader.str("node") else {
                collector.emit(
                    reader
                        .diagnostic("<endpoint> without `node` is ignored")
                        .with_code(ErrorCode::E101),
                );
                continue;
            };
            endpoints.push(Endpoint {
                node: Id::new(node),
                port: reader.str("port").map(str::to_string),
                kind: reader.parse_or("type", EndpointType::Undirected, &mut collector),
            });
        }

        if endpoints.is_empty() {
            collector.emit(
                Diagnostic::error(format!("hyperedge `{id}` has no endpoints"))
                    .with_code(ErrorCode::E201)
                    .with_element(id)
                    .with_span(markup.span(), "declared here")
                    .with_help("add <endpoint node=\"...\"/> children"),
            );
        }

        collector.finish(Self {
            endpoints,
            data: parse_data(markup),
        })
    }

    fn build(&self, _id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        Parsed::clean(RenderNode::Empty)
    }
}
