//! Edge realizers (`<y:PolyLineEdge>` and the curved variants).
//!
//! Curved realizers are drawn through their control points as polylines.

use std::str::FromStr;

use indexmap::IndexMap;

use trellis_core::{
    color::Color,
    draw::{Group, Paint, RenderLayer, RenderNode, StrokeDefinition},
    geometry::{Geometry, Point},
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, Markup,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, ns},
};

use super::parse_border;
use crate::{
    dialect::graphml::parse_endpoints,
    element::{BuildContext, ElementKind, Label},
};

/// Length of an arrow head along the edge, for a stroke width of 1.
const ARROW_LENGTH: f32 = 10.0;
/// Half of the arrow head's width.
const ARROW_HALF_WIDTH: f32 = 4.0;

/// Decoration at an edge end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrowType {
    #[default]
    None,
    Standard,
    Delta,
    WhiteDelta,
    Diamond,
    WhiteDiamond,
    Circle,
    TransparentCircle,
    Plain,
}

impl FromStr for ArrowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "standard" | "short" | "concave" | "convex" => Ok(Self::Standard),
            "delta" => Ok(Self::Delta),
            "white_delta" => Ok(Self::WhiteDelta),
            "diamond" => Ok(Self::Diamond),
            "white_diamond" => Ok(Self::WhiteDiamond),
            "circle" => Ok(Self::Circle),
            "transparent_circle" => Ok(Self::TransparentCircle),
            "plain" => Ok(Self::Plain),
            _ => Err(format!("unknown arrow type `{s}`, drawn as standard")),
        }
    }
}

impl ArrowType {
    /// Draws the arrow head with its tip at `tip`, pointing away from `from`.
    fn render(self, from: Point, tip: Point, stroke: &StrokeDefinition) -> RenderNode {
        let delta = tip.sub_point(from);
        let length = delta.hypot();
        if self == Self::None || length == 0.0 {
            return RenderNode::Empty;
        }

        let scale = stroke.width().max(1.0);
        let (len, half) = (ARROW_LENGTH * scale, ARROW_HALF_WIDTH * scale);
        let dir = delta.scale(1.0 / length);
        let normal = Point::new(-dir.y(), dir.x());
        let back = tip.sub_point(dir.scale(len));
        let left = back.add_point(normal.scale(half));
        let right = back.sub_point(normal.scale(half));

        let solid = Paint::new(Some(stroke.color()), Some(stroke.clone()));
        let hollow = Paint::new(Some(Color::white()), Some(stroke.clone()));
        match self {
            Self::None => RenderNode::Empty,
            Self::Standard | Self::Delta => RenderNode::Polygon {
                points: vec![tip, left, right],
                paint: solid,
            },
            Self::WhiteDelta => RenderNode::Polygon {
                points: vec![tip, left, right],
                paint: hollow,
            },
            Self::Diamond | Self::WhiteDiamond => {
                let far = tip.sub_point(dir.scale(len * 2.0));
                RenderNode::Polygon {
                    points: vec![tip, left, far, right],
                    paint: if self == Self::Diamond { solid } else { hollow },
                }
            }
            Self::Circle | Self::TransparentCircle => {
                let center = tip.sub_point(dir.scale(half));
                RenderNode::Ellipse {
                    bounds: Geometry::new(center.x() - half, center.y() - half, half * 2.0, half * 2.0),
                    paint: if self == Self::Circle { solid } else { hollow },
                }
            }
            Self::Plain => RenderNode::Polyline {
                points: vec![left, tip, right],
                stroke: stroke.clone(),
            },
        }
    }
}

/// An edge routed from a port on its source through bend points to its target.
///
/// Ports are offsets from the node centers. Bend points are absolute.
/// Labels are read relative to the source node center and become absolute
/// once the edge is attached to its document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyLineEdge {
    source: Option<Id>,
    target: Option<Id>,
    source_port: Point,
    target_port: Point,
    bends: Vec<Point>,
    line: StrokeDefinition,
    source_arrow: ArrowType,
    target_arrow: ArrowType,
    labels: Vec<Label>,
    labels_attached: bool,
}

impl PolyLineEdge {
    pub fn source(&self) -> Option<Id> {
        self.source
    }

    pub fn target(&self) -> Option<Id> {
        self.target
    }

    pub fn bends(&self) -> &[Point] {
        &self.bends
    }

    pub fn line(&self) -> &StrokeDefinition {
        &self.line
    }

    pub fn arrows(&self) -> (ArrowType, ArrowType) {
        (self.source_arrow, self.target_arrow)
    }

    fn resolve(&self, endpoint: Option<Id>, ctx: &BuildContext<'_>) -> Option<Geometry> {
        endpoint.and_then(|node| ctx.anchor(node))
    }
}

impl ElementKind for PolyLineEdge {
    const LAYER: RenderLayer = RenderLayer::Edge;

    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let (source, target) = parse_endpoints(markup, id, &mut collector);
        let mut edge = Self {
            source,
            target,
            ..Self::default()
        };
        let Some(realizer) = markup.realizer() else {
            return collector.finish(edge);
        };

        if let Some(path) = markup::child(realizer, ns::YWORKS, "Path") {
            let reader = AttributeReader::new(path).for_element(id);
            edge.source_port = Point::new(
                reader.f32_or("sx", 0.0, &mut collector),
                reader.f32_or("sy", 0.0, &mut collector),
            );
            edge.target_port = Point::new(
                reader.f32_or("tx", 0.0, &mut collector),
                reader.f32_or("ty", 0.0, &mut collector),
            );
            edge.bends = markup::children(path, ns::YWORKS, "Point")
                .map(|point| {
                    let reader = AttributeReader::new(point).for_element(id);
                    Point::new(
                        reader.required_f32("x", &mut collector),
                        reader.required_f32("y", &mut collector),
                    )
                })
                .collect();
        }

        edge.line = parse_border(markup::child(realizer, ns::YWORKS, "LineStyle"), &mut collector)
            .unwrap_or_default();

        if let Some(arrows) = markup::child(realizer, ns::YWORKS, "Arrows") {
            let reader = AttributeReader::new(arrows).for_element(id);
            edge.source_arrow = reader.parse_or("source", ArrowType::None, &mut collector);
            edge.target_arrow = reader.parse_or("target", ArrowType::Standard, &mut collector);
        }

        edge.labels = markup::children(realizer, ns::YWORKS, "EdgeLabel")
            .map(|label| Label::parse(label, Point::default(), &mut collector))
            .collect();

        collector.finish(edge)
    }

    fn build(&self, id: Id, ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        let (Some(source), Some(target)) =
            (self.resolve(self.source, ctx), self.resolve(self.target, ctx))
        else {
            let missing = [self.source, self.target]
                .into_iter()
                .flatten()
                .filter(|node| ctx.anchor(*node).is_none())
                .map(|node| format!("`{node}`"))
                .collect::<Vec<_>>();
            let message = if missing.is_empty() {
                format!("edge `{id}` has no endpoints to draw between")
            } else {
                format!("edge `{id}` refers to unknown node {}", missing.join(", "))
            };
            return Parsed::clean(RenderNode::Empty).with_diagnostic(
                Diagnostic::error(message)
                    .with_code(ErrorCode::E202)
                    .with_element(id)
                    .with_help("the edge is not drawn"),
            );
        };

        let mut points = Vec::with_capacity(self.bends.len() + 2);
        points.push(source.center().add_point(self.source_port));
        points.extend(self.bends.iter().copied());
        points.push(target.center().add_point(self.target_port));

        let mut group = Group::new().with_id(id.to_mask()).with_class("edge");
        let n = points.len();
        group.push(RenderNode::Polyline {
            points: points.clone(),
            stroke: self.line.clone(),
        });
        group.push(self.target_arrow.render(points[n - 2], points[n - 1], &self.line));
        group.push(self.source_arrow.render(points[1], points[0], &self.line));
        let label_origin = if self.labels_attached {
            Point::default()
        } else {
            source.center()
        };
        for label in &self.labels {
            group.push(label.render(label_origin));
        }
        Parsed::clean(RenderNode::Group(group))
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn labels_mut(&mut self) -> &mut [Label] {
        &mut self.labels
    }

    fn attach(&mut self, anchors: &IndexMap<Id, Geometry>) {
        if self.labels_attached {
            return;
        }
        let Some(source) = self.source.and_then(|node| anchors.get(&node)) else {
            return;
        };
        let center = source.center();
        for label in &mut self.labels {
            label.translate(center.x(), center.y());
        }
        self.labels_attached = true;
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        for bend in &mut self.bends {
            *bend = bend.translate(dx, dy);
        }
        for label in &mut self.labels {
            label.translate(dx, dy);
        }
    }
}
