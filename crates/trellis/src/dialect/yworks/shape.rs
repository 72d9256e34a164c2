//! `<y:ShapeNode>`: a single geometric shape with labels.

use std::str::FromStr;

use trellis_core::{
    draw::{Group, Paint, RenderNode},
    geometry::{Geometry, Point},
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, Markup,
    error::{DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, ns},
};

use super::NodeAppearance;
use crate::element::{BuildContext, ElementKind, Label};

/// Corner radius of `roundrectangle`.
const ROUND_RECT_RADIUS: f32 = 5.0;

/// The outline drawn for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapeType {
    #[default]
    Rectangle,
    RoundRectangle,
    Ellipse,
    Diamond,
    Triangle,
    Hexagon,
    Octagon,
    Parallelogram,
    /// Narrow at the top.
    Trapezoid,
    /// Narrow at the bottom.
    Trapezoid2,
}

impl FromStr for ShapeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rectangle" | "rectangle3d" => Ok(Self::Rectangle),
            "roundrectangle" => Ok(Self::RoundRectangle),
            "ellipse" => Ok(Self::Ellipse),
            "diamond" => Ok(Self::Diamond),
            "triangle" => Ok(Self::Triangle),
            "hexagon" => Ok(Self::Hexagon),
            "octagon" => Ok(Self::Octagon),
            "parallelogram" => Ok(Self::Parallelogram),
            "trapezoid" => Ok(Self::Trapezoid),
            "trapezoid2" => Ok(Self::Trapezoid2),
            _ => Err(format!("unknown shape type `{s}`, drawn as rectangle")),
        }
    }
}

impl ShapeType {
    /// Builds the outline of this shape filling `bounds`.
    pub fn outline(self, bounds: Geometry, paint: Paint) -> RenderNode {
        let (x, y, w, h) = (bounds.x(), bounds.y(), bounds.width(), bounds.height());
        let polygon = |points: &[(f32, f32)]| RenderNode::Polygon {
            points: points.iter().map(|&(px, py)| Point::new(px, py)).collect(),
            paint: paint.clone(),
        };

        match self {
            Self::Rectangle => RenderNode::rect(bounds, paint),
            Self::RoundRectangle => RenderNode::Rect {
                bounds,
                corner_radius: ROUND_RECT_RADIUS.min(w / 2.0).min(h / 2.0),
                paint,
            },
            Self::Ellipse => RenderNode::Ellipse { bounds, paint },
            Self::Diamond => polygon(&[
                (x + w / 2.0, y),
                (x + w, y + h / 2.0),
                (x + w / 2.0, y + h),
                (x, y + h / 2.0),
            ]),
            Self::Triangle => polygon(&[(x + w / 2.0, y), (x + w, y + h), (x, y + h)]),
            Self::Hexagon => {
                let inset = w / 4.0;
                polygon(&[
                    (x + inset, y),
                    (x + w - inset, y),
                    (x + w, y + h / 2.0),
                    (x + w - inset, y + h),
                    (x + inset, y + h),
                    (x, y + h / 2.0),
                ])
            }
            Self::Octagon => {
                let cut = w.min(h) * 0.29;
                polygon(&[
                    (x + cut, y),
                    (x + w - cut, y),
                    (x + w, y + cut),
                    (x + w, y + h - cut),
                    (x + w - cut, y + h),
                    (x + cut, y + h),
                    (x, y + h - cut),
                    (x, y + cut),
                ])
            }
            Self::Parallelogram => {
                let skew = w / 5.0;
                polygon(&[(x + skew, y), (x + w, y), (x + w - skew, y + h), (x, y + h)])
            }
            Self::Trapezoid => {
                let inset = w / 5.0;
                polygon(&[(x + inset, y), (x + w - inset, y), (x + w, y + h), (x, y + h)])
            }
            Self::Trapezoid2 => {
                let inset = w / 5.0;
                polygon(&[(x, y), (x + w, y), (x + w - inset, y + h), (x + inset, y + h)])
            }
        }
    }
}

/// Reads `<y:Shape type="...">`; unknown types fall back to a rectangle.
pub(crate) fn parse_shape(
    realizer: roxmltree::Node<'_, '_>,
    id: Id,
    default: ShapeType,
    collector: &mut DiagnosticCollector,
) -> ShapeType {
    let Some(node) = markup::child(realizer, ns::YWORKS, "Shape") else {
        return default;
    };
    let reader = AttributeReader::new(node).for_element(id);
    match reader.str("type").map(str::parse::<ShapeType>) {
        Some(Ok(shape)) => shape,
        Some(Err(message)) => {
            collector.emit(reader.diagnostic(message).with_code(ErrorCode::E103));
            ShapeType::Rectangle
        }
        None => default,
    }
}

/// A node drawn as one shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeNode {
    appearance: NodeAppearance,
    shape: ShapeType,
}

impl ShapeNode {
    pub fn appearance(&self) -> &NodeAppearance {
        &self.appearance
    }

    pub fn shape(&self) -> ShapeType {
        self.shape
    }
}

impl ElementKind for ShapeNode {
    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let Some(realizer) = markup.realizer() else {
            return collector.finish(Self::default());
        };

        let appearance = NodeAppearance::parse(realizer, id, &mut collector);
        let shape = parse_shape(realizer, id, ShapeType::Rectangle, &mut collector);
        collector.finish(Self { appearance, shape })
    }

    fn build(&self, id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        let mut group = Group::new().with_id(id.to_mask()).with_class("node");
        group.push(self.shape.outline(self.appearance.geometry, self.appearance.paint()));
        self.appearance.push_labels(&mut group);
        Parsed::clean(RenderNode::Group(group))
    }

    fn geometry(&self) -> Option<&Geometry> {
        Some(&self.appearance.geometry)
    }

    fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        Some(&mut self.appearance.geometry)
    }

    fn labels(&self) -> &[Label] {
        &self.appearance.labels
    }

    fn labels_mut(&mut self) -> &mut [Label] {
        &mut self.appearance.labels
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::dialect::yworks::test_support::parse_realizer;
    use trellis_core::geometry::GeometryPatch;
    use trellis_markup::ResourceTable;

    const NODE: &str = r##"<y:ShapeNode>
        <y:Geometry x="10.0" y="20.0" width="80.0" height="30.0"/>
        <y:Fill color="#FFCC00" transparent="false"/>
        <y:BorderStyle color="#000000" type="line" width="1.0"/>
        <y:NodeLabel x="5.0" y="6.0" width="40.0" height="18.0">Start</y:NodeLabel>
        <y:Shape type="ellipse"/>
    </y:ShapeNode>"##;

    #[test]
    fn test_parse_shape_node() {
        let parsed = parse_realizer::<ShapeNode>(NODE);
        assert!(parsed.is_clean());
        let node = parsed.value();
        assert_eq!(node.shape(), ShapeType::Ellipse);
        assert_eq!(node.bounds(), Geometry::new(10.0, 20.0, 80.0, 30.0));
        assert_eq!(node.labels()[0].text(), "Start");
        assert_eq!(node.labels()[0].position(), Point::new(15.0, 26.0));
    }

    #[test]
    fn test_unknown_shape_falls_back_to_rectangle() {
        let parsed = parse_realizer::<ShapeNode>(
            r#"<y:ShapeNode><y:Geometry x="0" y="0" width="1" height="1"/><y:Shape type="blob"/></y:ShapeNode>"#,
        );
        assert_eq!(parsed.value().shape(), ShapeType::Rectangle);
        assert_eq!(parsed.diagnostics().len(), 1);
        assert_eq!(parsed.diagnostics()[0].code(), Some(ErrorCode::E103));
        assert!(parsed.diagnostics()[0].severity().is_warning());
    }

    #[test]
    fn test_malformed_geometry_defaults_to_zero() {
        let parsed = parse_realizer::<ShapeNode>(
            r#"<y:ShapeNode><y:Geometry x="abc" y="2" width="-5" height="3"/></y:ShapeNode>"#,
        );
        let bounds = parsed.value().bounds();
        assert_eq!(bounds.x(), 0.0);
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 3.0);
        assert_eq!(parsed.diagnostics()[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_set_bounds_partial() {
        let mut node = parse_realizer::<ShapeNode>(NODE).into_value();
        node.set_bounds(GeometryPatch::new().with_y(100.0).with_width(5.0));
        assert_eq!(node.bounds(), Geometry::new(10.0, 100.0, 5.0, 30.0));
        node.set_bounds(GeometryPatch::new());
        assert_eq!(node.bounds(), Geometry::new(10.0, 100.0, 5.0, 30.0));
    }

    #[test]
    fn test_build_is_repeatable() {
        let node = parse_realizer::<ShapeNode>(NODE).into_value();
        let resources = ResourceTable::new();
        let ctx = BuildContext::new(&resources);
        let first = node.build(Id::new("n0"), &ctx);
        let second = node.build(Id::new("n0"), &ctx);
        assert_eq!(first, second);
        assert!(first.is_clean());

        let rendered = first.value().to_svg().to_string();
        assert!(rendered.contains("<ellipse"));
        assert!(rendered.contains("Start"));
    }

    #[test]
    fn test_outline_polygons() {
        let bounds = Geometry::new(0.0, 0.0, 100.0, 50.0);
        let RenderNode::Polygon { points, .. } = ShapeType::Diamond.outline(bounds, Paint::default())
        else {
            panic!("expected polygon");
        };
        assert_eq!(points.len(), 4);
        assert_approx_eq!(f32, points[1].x(), 100.0);
        assert_approx_eq!(f32, points[1].y(), 25.0);

        let RenderNode::Rect { corner_radius, .. } =
            ShapeType::RoundRectangle.outline(Geometry::new(0.0, 0.0, 4.0, 4.0), Paint::default())
        else {
            panic!("expected rect");
        };
        assert_approx_eq!(f32, corner_radius, 2.0);
    }

    proptest! {
        #[test]
        fn translate_is_additive(
            dx1 in -500.0f32..500.0, dy1 in -500.0f32..500.0,
            dx2 in -500.0f32..500.0, dy2 in -500.0f32..500.0,
        ) {
            let node = parse_realizer::<ShapeNode>(NODE).into_value();
            let mut stepwise = node.clone();
            stepwise.translate(dx1, dy1);
            stepwise.translate(dx2, dy2);
            let mut direct = node;
            direct.translate(dx1 + dx2, dy1 + dy2);

            let (a, b) = (stepwise.bounds(), direct.bounds());
            prop_assert!((a.x() - b.x()).abs() < 1e-2 && (a.y() - b.y()).abs() < 1e-2);
            let (la, lb) = (stepwise.labels()[0].position(), direct.labels()[0].position());
            prop_assert!((la.x() - lb.x()).abs() < 1e-2 && (la.y() - lb.y()).abs() < 1e-2);
        }
    }
}
