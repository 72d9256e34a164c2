//! The yWorks (yEd) dialect.
//!
//! yEd attaches a *realizer* element to each GraphML node or edge through a
//! `<data>` child, e.g.
//!
//! ```xml
//! <node id="n0">
//!   <data key="d6">
//!     <y:ShapeNode>
//!       <y:Geometry x="10" y="20" width="80" height="30"/>
//!       <y:Fill color="#FFCC00" transparent="false"/>
//!       <y:BorderStyle color="#000000" type="line" width="1.0"/>
//!       <y:NodeLabel>Start</y:NodeLabel>
//!       <y:Shape type="roundrectangle"/>
//!     </y:ShapeNode>
//!   </data>
//! </node>
//! ```
//!
//! The realizer's local name selects the kind registered here.

mod edge;
mod group;
mod shape;
mod svg_node;
mod table;
mod uml;

pub use edge::{ArrowType, PolyLineEdge};
pub use group::{GroupNode, ProxyAutoBoundsNode};
pub use shape::{ShapeNode, ShapeType};
pub use svg_node::SvgNode;
pub use table::TableNode;
pub use uml::{UmlClassNode, UmlNoteNode};

use roxmltree::Node;

use trellis_core::{
    color::Color,
    draw::{Group, Paint, StrokeDefinition, StrokeStyle},
    geometry::{Geometry, Insets},
    identifier::Id,
};
use trellis_markup::{
    AttributeReader,
    error::{DiagnosticCollector, ErrorCode},
    markup::{self, ns},
};

use crate::{element::Label, registry::Namespace};

/// The yWorks dialect with every supported realizer.
pub fn namespace() -> Namespace {
    Namespace::new(ns::YWORKS)
        .with_kind::<ShapeNode>("ShapeNode")
        .with_kind::<ShapeNode>("GenericNode")
        .with_kind::<PolyLineEdge>("PolyLineEdge")
        .with_kind::<PolyLineEdge>("BezierEdge")
        .with_kind::<PolyLineEdge>("ArcEdge")
        .with_kind::<PolyLineEdge>("QuadCurveEdge")
        .with_kind::<PolyLineEdge>("SplineEdge")
        .with_kind::<PolyLineEdge>("GenericEdge")
        .with_kind::<GroupNode>("GroupNode")
        .with_kind::<ProxyAutoBoundsNode>("ProxyAutoBoundsNode")
        .with_kind::<TableNode>("TableNode")
        .with_kind::<UmlClassNode>("UMLClassNode")
        .with_kind::<UmlNoteNode>("UMLNoteNode")
        .with_kind::<SvgNode>("SVGNode")
}

/// Geometry, paint and labels shared by every yWorks node realizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAppearance {
    pub geometry: Geometry,
    pub fill: Option<Color>,
    pub border: Option<StrokeDefinition>,
    pub labels: Vec<Label>,
}

impl NodeAppearance {
    /// Reads `<y:Geometry>`, `<y:Fill>`, `<y:BorderStyle>` and `<y:NodeLabel>`s.
    pub fn parse(realizer: Node<'_, '_>, id: Id, collector: &mut DiagnosticCollector) -> Self {
        let geometry = parse_geometry(realizer, id, collector);
        let labels = markup::children(realizer, ns::YWORKS, "NodeLabel")
            .map(|label| Label::parse(label, geometry.origin(), collector))
            .collect();
        Self {
            geometry,
            fill: parse_fill(markup::child(realizer, ns::YWORKS, "Fill"), collector),
            border: parse_border(markup::child(realizer, ns::YWORKS, "BorderStyle"), collector),
            labels,
        }
    }

    pub fn paint(&self) -> Paint {
        Paint::new(self.fill, self.border.clone())
    }

    /// Appends the rendered labels to `group`.
    pub fn push_labels(&self, group: &mut Group) {
        push_labels(&self.labels, group);
    }
}

pub(crate) fn push_labels(labels: &[Label], group: &mut Group) {
    for label in labels {
        group.push(label.render(Default::default()));
    }
}

/// Reads the realizer's `<y:Geometry>`; a missing one yields the zero rectangle.
pub(crate) fn parse_geometry(
    realizer: Node<'_, '_>,
    id: Id,
    collector: &mut DiagnosticCollector,
) -> Geometry {
    let Some(node) = markup::child(realizer, ns::YWORKS, "Geometry") else {
        collector.emit(
            AttributeReader::new(realizer)
                .for_element(id)
                .diagnostic(format!(
                    "<y:{}> of `{id}` has no <y:Geometry>",
                    realizer.tag_name().name()
                ))
                .with_code(ErrorCode::E102)
                .with_help("the element is placed at the origin with zero size"),
        );
        return Geometry::zero();
    };
    let reader = AttributeReader::new(node).for_element(id);
    Geometry::new(
        reader.required_f32("x", collector),
        reader.required_f32("y", collector),
        reader.required_f32("width", collector),
        reader.required_f32("height", collector),
    )
}

/// `<y:Fill>`: no fill when absent, transparent or without color.
pub(crate) fn parse_fill(
    node: Option<Node<'_, '_>>,
    collector: &mut DiagnosticCollector,
) -> Option<Color> {
    let reader = AttributeReader::new(node?);
    if reader.bool_or("transparent", false) || !reader.bool_or("hasColor", true) {
        return None;
    }
    reader.color("color", collector)
}

/// `<y:BorderStyle>` or `<y:LineStyle>`; a missing element means the default stroke.
pub(crate) fn parse_border(
    node: Option<Node<'_, '_>>,
    collector: &mut DiagnosticCollector,
) -> Option<StrokeDefinition> {
    let Some(node) = node else {
        return Some(StrokeDefinition::default());
    };
    let reader = AttributeReader::new(node);
    if !reader.bool_or("hasColor", true) {
        return None;
    }
    let color = reader.color("color", collector).unwrap_or_default();
    let width = reader.f32_or("width", 1.0, collector);
    let style = reader.parse_or("type", StrokeStyle::Solid, collector);
    Some(StrokeDefinition::new(color, width).with_style(style))
}

/// `<y:Insets>`-style element with `top`, `right`, `bottom`, `left`.
pub(crate) fn parse_insets(node: Option<Node<'_, '_>>, collector: &mut DiagnosticCollector) -> Insets {
    let Some(node) = node else {
        return Insets::default();
    };
    let reader = AttributeReader::new(node);
    Insets::new(
        reader.f32_or("top", 0.0, collector),
        reader.f32_or("right", 0.0, collector),
        reader.f32_or("bottom", 0.0, collector),
        reader.f32_or("left", 0.0, collector),
    )
}
