//! Text labels attached to elements.

use roxmltree::Node;

use trellis_core::{
    color::Color,
    draw::{FontSpec, FontStyle, Group, Paint, RenderNode, StrokeDefinition, TextAnchor, TextNode},
    geometry::{Geometry, Point, Size},
};
use trellis_markup::{AttributeReader, error::DiagnosticCollector, markup};

/// Horizontal room kept between a label box and its text.
const TEXT_PADDING: f32 = 2.0;

/// A text label with its box and font.
///
/// Node labels store an absolute position. Edge labels store a position
/// relative to the center of the edge's source node, which is only known
/// when the edge is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    position: Point,
    size: Size,
    font: FontSpec,
    alignment: TextAnchor,
    visible: bool,
    background: Option<Color>,
    line_color: Option<Color>,
}

impl Label {
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
            size: Size::default(),
            font: FontSpec::default(),
            alignment: TextAnchor::Middle,
            visible: true,
            background: None,
            line_color: None,
        }
    }

    /// Reads a `<y:NodeLabel>` or `<y:EdgeLabel>`; `x`/`y` are taken relative to `origin`.
    pub fn parse(node: Node<'_, '_>, origin: Point, collector: &mut DiagnosticCollector) -> Self {
        let reader = AttributeReader::new(node);

        let text = if reader.bool_or("hasText", true) {
            markup::text_content(node)
        } else {
            String::new()
        };

        let position = origin.translate(
            reader.f32_or("x", 0.0, collector),
            reader.f32_or("y", 0.0, collector),
        );
        let size = Size::new(
            reader.f32_or("width", 0.0, collector).max(0.0),
            reader.f32_or("height", 0.0, collector).max(0.0),
        );

        let mut font = FontSpec::new(
            reader.str("fontFamily").unwrap_or("Dialog"),
            reader.f32_or("fontSize", 12.0, collector),
        )
        .with_style(reader.parse_or("fontStyle", FontStyle::Plain, collector))
        .with_underline(reader.bool_or("underlinedText", false));
        if let Some(color) = reader.color("textColor", collector) {
            font = font.with_color(color);
        }

        let background = if reader.bool_or("hasBackgroundColor", true) {
            reader.color("backgroundColor", collector)
        } else {
            None
        };
        let line_color = if reader.bool_or("hasLineColor", true) {
            reader.color("lineColor", collector)
        } else {
            None
        };

        Self {
            text,
            position,
            size,
            font,
            alignment: reader.parse_or("alignment", TextAnchor::Middle, collector),
            visible: reader.bool_or("visible", true),
            background,
            line_color,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_alignment(mut self, alignment: TextAnchor) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn alignment(&self) -> TextAnchor {
        self.alignment
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn bounds(&self) -> Geometry {
        Geometry::from_origin(self.position, self.size)
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position = self.position.translate(dx, dy);
    }

    /// Builds the label's subtree with its box shifted by `offset`.
    pub fn render(&self, offset: Point) -> RenderNode {
        if !self.visible {
            return RenderNode::Empty;
        }
        let bounds = self.bounds().translate(offset.x(), offset.y());

        let mut group = Group::new().with_class("label");
        if self.background.is_some() || self.line_color.is_some() {
            let stroke = self.line_color.map(|color| StrokeDefinition::new(color, 1.0));
            group.push(RenderNode::rect(bounds, Paint::new(self.background, stroke)));
        }

        let lines: Vec<String> = self.lines().map(str::to_string).collect();
        if !lines.is_empty() {
            let line_height = self.font.line_height();
            let text_height = line_height * lines.len() as f32;
            let top = bounds.y() + ((bounds.height() - text_height) / 2.0).max(0.0);
            let x = match self.alignment {
                TextAnchor::Start => bounds.x() + TEXT_PADDING,
                TextAnchor::Middle => bounds.center().x(),
                TextAnchor::End => bounds.max_x() - TEXT_PADDING,
            };
            group.push(RenderNode::Text(TextNode {
                position: Point::new(x, top + self.font.size()),
                lines,
                font: self.font.clone(),
                anchor: self.alignment,
            }));
        }

        RenderNode::Group(group)
    }
}
