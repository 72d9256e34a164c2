//! Integration tests for the DocumentBuilder API.

use std::{collections::HashSet, rc::Rc};

use trellis::{
    DocumentBuilder, TrellisError,
    config::{AppConfig, RenderConfig, StyleConfig},
    diagnostics::{ErrorCode, Parsed},
    draw::{RenderNode, TextAnchor, TextNode},
    element::{BuildContext, ElementKind},
    geometry::Point,
    identifier::Id,
    registry::Namespace,
};
use trellis_markup::Markup;

const CLOUD: &str = r##"&lt;?xml version="1.0" encoding="UTF-8"?&gt;
&lt;svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"&gt;
  &lt;defs&gt;&lt;linearGradient id="shade"/&gt;&lt;/defs&gt;
  &lt;ellipse cx="10" cy="5" rx="10" ry="5" fill="url(#shade)"/&gt;
&lt;/svg&gt;"##;

fn yed_document(nodes: &str, resources: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:y="http://www.yworks.com/xml/graphml" xmlns:yed="http://www.yworks.com/xml/yed/3">
  <key for="node" id="d6" yfiles.type="nodegraphics"/>
  <key for="edge" id="d10" yfiles.type="edgegraphics"/>
  <key for="graphml" id="d7" yfiles.type="resources"/>
  <graph edgedefault="directed" id="G">
{nodes}
  </graph>
  <data key="d7"><y:Resources>{resources}</y:Resources></data>
</graphml>"#
    )
}

fn svg_node(id: &str, x: f32) -> String {
    format!(
        r#"<node id="{id}"><data key="d6"><y:SVGNode>
  <y:Geometry height="30.0" width="60.0" x="{x}" y="0.0"/>
  <y:NodeLabel>{id}</y:NodeLabel>
  <y:SVGModel svgBoundsPolicy="0"><y:SVGContent refid="1"/></y:SVGModel>
</y:SVGNode></data></node>"#
    )
}

fn ids_and_refs(svg: &str) -> (HashSet<String>, Vec<String>) {
    let ids = svg
        .split("id=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect();
    let refs = svg
        .split("url(#")
        .skip(1)
        .filter_map(|rest| rest.split(')').next())
        .map(str::to_string)
        .collect();
    (ids, refs)
}

#[test]
fn test_builder_api_exists() {
    let builder = DocumentBuilder::default();
    assert!(builder.registry().len() >= 2);
}

#[test]
fn test_parse_invalid_xml_returns_error() {
    let builder = DocumentBuilder::default();
    let result = builder.parse("<graphml><graph></graphml>");
    assert!(matches!(result, Err(TrellisError::Markup { .. })));
}

#[test]
fn test_render_simple_document() {
    let source = yed_document(
        r##"<node id="n0"><data key="d6"><y:ShapeNode>
  <y:Geometry height="30.0" width="80.0" x="0.0" y="0.0"/>
  <y:Fill color="#FFCC00" transparent="false"/>
  <y:NodeLabel>Start</y:NodeLabel>
  <y:Shape type="ellipse"/>
</y:ShapeNode></data></node>"##,
        "",
    );
    let builder = DocumentBuilder::default();
    let document = builder.parse(&source).expect("Failed to parse document");
    assert!(document.is_clean(), "{:?}", document.diagnostics());

    let svg = builder
        .render_svg(document.value())
        .expect("Failed to render document");
    assert!(svg.is_clean());
    assert!(svg.value().contains("<svg"));
    assert!(svg.value().contains("</svg>"));
    assert!(svg.value().contains("<ellipse"));
    assert!(svg.value().contains("Start"));
}

#[test]
fn test_shared_resource_is_masked_per_node() {
    let source = yed_document(
        &[svg_node("n0", 0.0), svg_node("n1", 100.0)].join("\n"),
        &format!(r#"<y:Resource id="1">{CLOUD}</y:Resource>"#),
    );
    let builder = DocumentBuilder::default();
    let document = builder.parse(&source).unwrap();
    assert!(document.is_clean(), "{:?}", document.diagnostics());

    let svg = builder.render_svg(document.value()).unwrap();
    assert!(svg.is_clean());
    let (ids, refs) = ids_and_refs(svg.value());
    assert!(ids.contains("n0_shade"));
    assert!(ids.contains("n1_shade"));
    assert!(!ids.contains("shade"));
    assert_eq!(refs.len(), 2);
    assert!(refs.iter().all(|r| ids.contains(r)));
    assert_ne!(refs[0], refs[1]);
}

#[test]
fn test_unknown_resource_is_a_diagnostic() {
    let source = yed_document(&svg_node("n0", 0.0), "");
    let builder = DocumentBuilder::default();
    let document = builder.parse(&source).unwrap();

    let svg = builder.render_svg(document.value()).unwrap();
    assert_eq!(svg.diagnostics().len(), 1);
    assert_eq!(svg.diagnostics()[0].code(), Some(ErrorCode::E301));
    assert!(svg.value().contains("n0"));
}

#[test]
fn test_dangling_edge_is_a_diagnostic() {
    let source = yed_document(
        r#"<node id="n0"><data key="d6"><y:ShapeNode><y:Geometry height="30.0" width="30.0" x="0.0" y="0.0"/></y:ShapeNode></data></node>
<edge id="e0" source="n0" target="n9"><data key="d10"><y:PolyLineEdge/></data></edge>"#,
        "",
    );
    let builder = DocumentBuilder::default();
    let document = builder.parse(&source).unwrap();
    assert!(document.is_clean());

    let svg = builder.render_svg(document.value()).unwrap();
    assert_eq!(svg.diagnostics()[0].code(), Some(ErrorCode::E202));
}

#[test]
fn test_margin_from_config() {
    let source = yed_document(
        r#"<node id="n0"><data key="d6"><y:ShapeNode><y:Geometry height="10.0" width="10.0" x="0.0" y="0.0"/></y:ShapeNode></data></node>"#,
        "",
    );
    let config = AppConfig::new(RenderConfig::new(5.0), StyleConfig::default());
    let builder = DocumentBuilder::new(config);
    let document = builder.parse(&source).unwrap();
    let svg = builder.render_svg(document.value()).unwrap();
    assert!(svg.value().contains("viewBox=\"-5 -5 20 20\""));
}

#[test]
fn test_invalid_background_fails_render() {
    let config = AppConfig::new(
        RenderConfig::default(),
        StyleConfig::new(Some("no-such-color".to_string())),
    );
    let builder = DocumentBuilder::new(config);
    let document = builder.parse(&yed_document("", "")).unwrap();
    assert!(matches!(
        builder.render_svg(document.value()),
        Err(TrellisError::Export(_))
    ));
}

/// A dialect kind defined outside the crate.
#[derive(Debug, Clone, Default)]
struct Pin {
    text: String,
}

impl ElementKind for Pin {
    fn parse(markup: Markup<'_, '_>, _id: Id) -> Parsed<Self> {
        let text = markup
            .realizer()
            .and_then(|realizer| realizer.attribute("text"))
            .unwrap_or_default()
            .to_string();
        Parsed::clean(Self { text })
    }

    fn build(&self, _id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        Parsed::clean(RenderNode::Text(TextNode {
            position: Point::new(0.0, 0.0),
            lines: vec![self.text.clone()],
            font: Default::default(),
            anchor: TextAnchor::Start,
        }))
    }
}

#[test]
fn test_install_custom_dialect() {
    let source = r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:p="urn:example:pins">
  <graph id="G" edgedefault="undirected">
    <node id="a"><data key="d0"><p:Pin text="here"/></data></node>
  </graph>
</graphml>"#;

    let mut builder = DocumentBuilder::default();
    let pins = Rc::new(Namespace::new("urn:example:pins").with_kind::<Pin>("Pin"));
    let installed = builder.install_dialect(&pins, false);
    assert!(installed.is_clean());
    assert!(*installed.value());

    let conflict = builder.install_dialect(&Rc::new(Namespace::new("urn:example:pins")), false);
    assert!(!*conflict.value());
    assert_eq!(conflict.diagnostics()[0].code(), Some(ErrorCode::E400));

    let document = builder.parse(source).unwrap();
    assert_eq!(document.value().elements().next().unwrap().kind(), "Pin");
    let svg = builder.render_svg(document.value()).unwrap();
    assert!(svg.value().contains("here"));
}
