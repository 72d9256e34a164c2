//! The renderable output tree.
//!
//! Every element kind builds a [`RenderNode`] subtree with fully resolved,
//! absolute geometry. The tree is plain data: it can be inspected in tests,
//! rebuilt at will, and converted into `svg` crate nodes for serialization.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{FontSpec, StrokeDefinition, TextAnchor, XmlElement},
    geometry::{Geometry, Point},
};

/// Fill and outline of a closed shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<StrokeDefinition>,
}

impl Paint {
    pub fn new(fill: Option<Color>, stroke: Option<StrokeDefinition>) -> Self {
        Self { fill, stroke }
    }

    /// Fill only, no outline.
    pub fn filled(fill: Color) -> Self {
        Self::new(Some(fill), None)
    }

    fn apply<T: svg::Node>(&self, mut element: T) -> T {
        match self.fill {
            Some(fill) => {
                element.assign("fill", fill.to_opaque_string());
                if fill.alpha() < 1.0 {
                    element.assign("fill-opacity", fill.alpha());
                }
            }
            None => element.assign("fill", "none"),
        }
        match &self.stroke {
            Some(stroke) => stroke.assign_to(&mut element),
            None => element.assign("stroke", "none"),
        }
        element
    }
}

/// A group of nodes sharing an optional identifier, class and transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub id: Option<String>,
    pub class: Option<String>,
    pub transform: Option<String>,
    pub children: Vec<RenderNode>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub fn push(&mut self, node: RenderNode) {
        if !matches!(node, RenderNode::Empty) {
            self.children.push(node);
        }
    }
}

/// Multi-line text anchored at `position` (baseline of the first line).
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub position: Point,
    pub lines: Vec<String>,
    pub font: FontSpec,
    pub anchor: TextAnchor,
}

/// A node of the renderable output tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Group(Group),
    Rect {
        bounds: Geometry,
        corner_radius: f32,
        paint: Paint,
    },
    Ellipse {
        bounds: Geometry,
        paint: Paint,
    },
    Polygon {
        points: Vec<Point>,
        paint: Paint,
    },
    Polyline {
        points: Vec<Point>,
        stroke: StrokeDefinition,
    },
    Path {
        data: String,
        paint: Paint,
    },
    Text(TextNode),
    /// A foreign XML subtree, serialized verbatim.
    Embedded(XmlElement),
    /// Placeholder for content that could not be produced.
    Empty,
}

impl RenderNode {
    pub fn rect(bounds: Geometry, paint: Paint) -> Self {
        Self::Rect {
            bounds,
            corner_radius: 0.0,
            paint,
        }
    }

    /// Returns the direct children of a group, or an empty slice.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Group(group) => &group.children,
            _ => &[],
        }
    }

    /// Returns true for the empty placeholder or a group without children.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Group(group) => group.children.iter().all(RenderNode::is_empty),
            _ => false,
        }
    }

    /// Calls `visit` on this node and every descendant render node.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RenderNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Converts this subtree into an `svg` crate node.
    pub fn to_svg(&self) -> Box<dyn svg::Node> {
        match self {
            Self::Group(group) => {
                let mut element = svg_element::Group::new();
                if let Some(id) = &group.id {
                    element = element.set("id", id.as_str());
                }
                if let Some(class) = &group.class {
                    element = element.set("class", class.as_str());
                }
                if let Some(transform) = &group.transform {
                    element = element.set("transform", transform.as_str());
                }
                for child in &group.children {
                    element = element.add(child.to_svg());
                }
                Box::new(element)
            }
            Self::Rect {
                bounds,
                corner_radius,
                paint,
            } => {
                let mut element = svg_element::Rectangle::new()
                    .set("x", bounds.x())
                    .set("y", bounds.y())
                    .set("width", bounds.width())
                    .set("height", bounds.height());
                if *corner_radius > 0.0 {
                    element = element.set("rx", *corner_radius).set("ry", *corner_radius);
                }
                Box::new(paint.apply(element))
            }
            Self::Ellipse { bounds, paint } => {
                let center = bounds.center();
                let element = svg_element::Ellipse::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("rx", bounds.width() / 2.0)
                    .set("ry", bounds.height() / 2.0);
                Box::new(paint.apply(element))
            }
            Self::Polygon { points, paint } => {
                let element = svg_element::Polygon::new().set("points", format_points(points));
                Box::new(paint.apply(element))
            }
            Self::Polyline { points, stroke } => {
                let element = svg_element::Polyline::new()
                    .set("points", format_points(points))
                    .set("fill", "none");
                Box::new(apply_stroke!(element, stroke))
            }
            Self::Path { data, paint } => {
                let element = svg_element::Path::new().set("d", data.as_str());
                Box::new(paint.apply(element))
            }
            Self::Text(text) => Box::new(render_text(text)),
            Self::Embedded(xml) => Box::new(xml.to_svg()),
            Self::Empty => Box::new(svg_element::Group::new()),
        }
    }
}

fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.x(), point.y()))
        .collect::<Vec<_>>()
        .join(" ")
}

// One `<text>` per line keeps the output independent of tspan support.
fn render_text(text: &TextNode) -> svg_element::Group {
    let line_height = text.font.line_height();
    let mut group = svg_element::Group::new();
    for (idx, line) in text.lines.iter().enumerate() {
        let element = svg_element::Text::new(line.as_str())
            .set("x", text.position.x())
            .set("y", text.position.y() + line_height * idx as f32)
            .set("text-anchor", text.anchor.to_svg_value());
        group = group.add(text.font.apply_to(element));
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_push_skips_empty() {
        let mut group = Group::new();
        group.push(RenderNode::Empty);
        group.push(RenderNode::rect(Geometry::new(0.0, 0.0, 1.0, 1.0), Paint::default()));
        assert_eq!(group.children.len(), 1);
    }

    #[test]
    fn test_is_empty() {
        assert!(RenderNode::Empty.is_empty());
        assert!(RenderNode::Group(Group::new()).is_empty());
        let rect = RenderNode::rect(Geometry::zero(), Paint::default());
        assert!(!rect.is_empty());
    }

    #[test]
    fn test_walk_collects_all_nodes() {
        let mut inner = Group::new();
        inner.push(RenderNode::rect(Geometry::zero(), Paint::default()));
        let mut outer = Group::new();
        outer.push(RenderNode::Group(inner));
        outer.push(RenderNode::rect(Geometry::zero(), Paint::default()));

        let mut count = 0;
        RenderNode::Group(outer).walk(&mut |_| count += 1);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_rect_to_svg() {
        let node = RenderNode::Rect {
            bounds: Geometry::new(1.0, 2.0, 30.0, 40.0),
            corner_radius: 4.0,
            paint: Paint::new(
                Some(Color::new("#ffcc00").unwrap()),
                Some(StrokeDefinition::default()),
            ),
        };
        let rendered = node.to_svg().to_string();
        assert!(rendered.contains("width=\"30\""));
        assert!(rendered.contains("rx=\"4\""));
        assert!(rendered.contains("stroke-width=\"1\""));
    }

    #[test]
    fn test_unfilled_paint() {
        let node = RenderNode::rect(Geometry::zero(), Paint::default());
        let rendered = node.to_svg().to_string();
        assert!(rendered.contains("fill=\"none\""));
        assert!(rendered.contains("stroke=\"none\""));
    }

    #[test]
    fn test_text_lines_become_text_elements() {
        let node = RenderNode::Text(TextNode {
            position: Point::new(5.0, 10.0),
            lines: vec!["first".to_string(), "second".to_string()],
            font: FontSpec::default(),
            anchor: TextAnchor::Start,
        });
        let rendered = node.to_svg().to_string();
        assert_eq!(rendered.matches("<text").count(), 2);
        assert!(rendered.contains("text-anchor=\"start\""));
    }
}
