//! UML realizers: `<y:UMLClassNode>` and `<y:UMLNoteNode>`.

use trellis_core::{
    draw::{FontSpec, FontStyle, Group, Paint, RenderNode, TextAnchor, TextNode},
    geometry::{Geometry, Point},
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, Markup,
    error::{DiagnosticCollector, Parsed},
    markup::{self, ns},
};

use super::NodeAppearance;
use crate::element::{BuildContext, ElementKind, Label};

/// Vertical padding inside each class compartment.
const COMPARTMENT_PADDING: f32 = 4.0;
/// Horizontal padding of attribute and method lines.
const MEMBER_INDENT: f32 = 4.0;
/// Size of the folded corner of a note.
const NOTE_FOLD: f32 = 12.0;

/// A UML class box.
///
/// The first label is the class name and is drawn centered in the name
/// compartment, with the stereotype above and the constraint below it.
/// Any further labels are drawn where the markup places them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UmlClassNode {
    appearance: NodeAppearance,
    stereotype: Option<String>,
    constraint: Option<String>,
    attributes: Vec<String>,
    methods: Vec<String>,
    omit_details: bool,
}

impl UmlClassNode {
    pub fn appearance(&self) -> &NodeAppearance {
        &self.appearance
    }

    /// The class name, taken from the first label.
    pub fn name(&self) -> &str {
        self.appearance.labels.first().map_or("", Label::text)
    }

    pub fn stereotype(&self) -> Option<&str> {
        self.stereotype.as_deref()
    }

    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    fn name_font(&self) -> FontSpec {
        self.appearance
            .labels
            .first()
            .map_or_else(|| FontSpec::default().with_style(FontStyle::Bold), |l| l.font().clone())
    }

    /// Lines of the name compartment.
    fn header_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(stereotype) = &self.stereotype {
            lines.push(format!("«{stereotype}»"));
        }
        lines.extend(self.name().lines().map(str::to_string));
        if let Some(constraint) = &self.constraint {
            lines.push(format!("{{{constraint}}}"));
        }
        lines
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn member_lines(uml: roxmltree::Node<'_, '_>, name: &str) -> Vec<String> {
    markup::child(uml, ns::YWORKS, name)
        .map(|node| {
            markup::text_content(node)
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl ElementKind for UmlClassNode {
    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let Some(realizer) = markup.realizer() else {
            return collector.finish(Self::default());
        };

        let mut node = Self {
            appearance: NodeAppearance::parse(realizer, id, &mut collector),
            ..Self::default()
        };
        if let Some(uml) = markup::child(realizer, ns::YWORKS, "UML") {
            let reader = AttributeReader::new(uml);
            node.stereotype = non_empty(reader.str("stereotype"));
            node.constraint = non_empty(reader.str("constraint"));
            node.omit_details = reader.bool_or("omitDetails", false);
            node.attributes = member_lines(uml, "AttributeLabel");
            node.methods = member_lines(uml, "MethodLabel");
        }
        collector.finish(node)
    }

    fn build(&self, id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        let bounds = self.appearance.geometry;
        let paint = self.appearance.paint();
        let mut group = Group::new().with_id(id.to_mask()).with_class("uml-class");
        group.push(RenderNode::rect(bounds, paint.clone()));

        let name_font = self.name_font();
        let header = self.header_lines();
        let header_height =
            name_font.line_height() * header.len() as f32 + COMPARTMENT_PADDING * 2.0;
        group.push(RenderNode::Text(TextNode {
            position: Point::new(
                bounds.center().x(),
                bounds.y() + COMPARTMENT_PADDING + name_font.size(),
            ),
            lines: header,
            font: name_font,
            anchor: TextAnchor::Middle,
        }));

        let mut y = bounds.y() + header_height;
        if !self.omit_details {
            let stroke = paint.stroke.clone().unwrap_or_default();
            let member_font = FontSpec::default();
            for members in [&self.attributes, &self.methods] {
                group.push(RenderNode::Polyline {
                    points: vec![Point::new(bounds.x(), y), Point::new(bounds.max_x(), y)],
                    stroke: stroke.clone(),
                });
                if !members.is_empty() {
                    group.push(RenderNode::Text(TextNode {
                        position: Point::new(
                            bounds.x() + MEMBER_INDENT,
                            y + COMPARTMENT_PADDING + member_font.size(),
                        ),
                        lines: members.clone(),
                        font: member_font.clone(),
                        anchor: TextAnchor::Start,
                    }));
                }
                y += member_font.line_height() * members.len() as f32 + COMPARTMENT_PADDING * 2.0;
            }
        }

        for label in self.appearance.labels.iter().skip(1) {
            group.push(label.render(Point::default()));
        }
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

/// A UML note: a rectangle with a folded top-right corner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UmlNoteNode {
    appearance: NodeAppearance,
}

impl UmlNoteNode {
    pub fn appearance(&self) -> &NodeAppearance {
        &self.appearance
    }
}

impl ElementKind for UmlNoteNode {
    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let appearance = match markup.realizer() {
            Some(realizer) => NodeAppearance::parse(realizer, id, &mut collector),
            None => NodeAppearance::default(),
        };
        collector.finish(Self { appearance })
    }

    fn build(&self, id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        let b = self.appearance.geometry;
        let fold = NOTE_FOLD.min(b.width() / 2.0).min(b.height() / 2.0);
        let paint = self.appearance.paint();

        let outline = format!(
            "M {x} {y} L {fx} {y} L {r} {fy} L {r} {bottom} L {x} {bottom} Z",
            x = b.x(),
            y = b.y(),
            fx = b.max_x() - fold,
            fy = b.y() + fold,
            r = b.max_x(),
            bottom = b.max_y(),
        );
        let corner = format!(
            "M {fx} {y} L {fx} {fy} L {r} {fy}",
            fx = b.max_x() - fold,
            y = b.y(),
            fy = b.y() + fold,
            r = b.max_x(),
        );

        let mut group = Group::new().with_id(id.to_mask()).with_class("uml-note");
        group.push(RenderNode::Path {
            data: outline,
            paint: paint.clone(),
        });
        group.push(RenderNode::Path {
            data: corner,
            paint: Paint::new(None, paint.stroke),
        });
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
