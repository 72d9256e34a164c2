//! SVG export backend.

use std::io;

use log::{debug, info};
use svg::node::element as svg_element;

use trellis_core::{
    color::Color,
    draw::LayeredOutput,
    geometry::{Bounds, Geometry, Insets},
};
use trellis_markup::{
    error::{Diagnostic, DiagnosticCollector, Parsed},
    markup::ns,
};

use super::{Error, Exporter};
use crate::{
    config::{AppConfig, RenderConfig, StyleConfig},
    document::Document,
    element::BuildContext,
};

/// Builder for [`Svg`].
#[derive(Debug, Clone)]
pub struct SvgBuilder {
    margin: f32,
    style: StyleConfig,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self {
            margin: RenderConfig::default().margin(),
            style: StyleConfig::default(),
        }
    }

    /// Takes the margin and style sections of `config`.
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_margin(config.render().margin())
            .with_style(config.style())
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Render`] if the configured background color does not parse.
    pub fn build(self) -> Result<Svg, Error> {
        let background = self.style.background_color().map_err(Error::Render)?;
        Ok(Svg {
            margin: self.margin.max(0.0),
            background,
        })
    }
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a [`Document`] as one standalone SVG document.
#[derive(Debug, Clone)]
pub struct Svg {
    margin: f32,
    background: Option<Color>,
}

impl Svg {
    /// Builds every element and stacks the subtrees by layer.
    pub fn render_document(&self, document: &Document) -> Parsed<svg::Document> {
        let mut collector = DiagnosticCollector::new();
        let anchors = document.anchors();
        let ctx = BuildContext::new(document.resources()).with_anchors(&anchors);

        let mut output = LayeredOutput::new();
        for element in document.elements() {
            let node = collector.absorb(element.build_subtree(&ctx));
            output.add_to_layer(element.layer(), node);
        }

        let canvas = document
            .bounds()
            .unwrap_or_else(|| Geometry::zero().to_bounds())
            .expand(Insets::uniform(self.margin));
        debug!(
            width = canvas.width(),
            height = canvas.height(),
            diagnostics = collector.len();
            "Document rendered"
        );

        // Embedded fragments keep `xlink:` attributes.
        let mut doc = svg::Document::new()
            .set("xmlns:xlink", ns::XLINK)
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    canvas.min_x(),
                    canvas.min_y(),
                    canvas.width(),
                    canvas.height()
                ),
            )
            .set("width", canvas.width())
            .set("height", canvas.height());
        doc = self.add_background(doc, canvas);
        for layer in output.render() {
            doc = doc.add(layer);
        }
        collector.finish(doc)
    }

    fn add_background(&self, doc: svg::Document, canvas: Bounds) -> svg::Document {
        let Some(color) = self.background else {
            return doc;
        };
        let mut rect = svg_element::Rectangle::new()
            .set("x", canvas.min_x())
            .set("y", canvas.min_y())
            .set("width", canvas.width())
            .set("height", canvas.height())
            .set("fill", color.to_opaque_string());
        if color.alpha() < 1.0 {
            rect = rect.set("fill-opacity", color.alpha());
        }
        doc.add(rect)
    }
}

impl Exporter for Svg {
    fn export_document<W: io::Write>(
        &mut self,
        document: &Document,
        writer: W,
    ) -> Result<Vec<Diagnostic>, Error> {
        let (doc, diagnostics) = self.render_document(document).into_parts();
        svg::write(writer, &doc).map_err(Error::Io)?;
        info!(elements = document.len(); "SVG written");
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NamespaceRegistry;

    const SOURCE: &str = r##"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:y="http://www.yworks.com/xml/graphml">
  <graph id="G" edgedefault="directed">
    <node id="n0"><data key="d0"><y:ShapeNode><y:Geometry x="0" y="0" width="40" height="20"/></y:ShapeNode></data></node>
    <node id="n1"><data key="d0"><y:GroupNode><y:Geometry x="100" y="0" width="40" height="20"/></y:GroupNode></data></node>
    <edge id="e0" source="n0" target="n1"><data key="d1"><y:PolyLineEdge/></data></edge>
  </graph>
</graphml>"##;

    const XLINKED: &str = r##"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:y="http://www.yworks.com/xml/graphml">
  <graph id="G" edgedefault="directed">
    <node id="n0"><data key="d0"><y:SVGNode>
      <y:Geometry x="0" y="0" width="20" height="20"/>
      <y:SVGModel svgBoundsPolicy="0"><y:SVGContent refid="1"/></y:SVGModel>
    </y:SVGNode></data></node>
  </graph>
  <data key="d1"><y:Resources><y:Resource id="1">&lt;svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="20" height="20"&gt;&lt;circle id="dot" r="5"/&gt;&lt;use xlink:href="#dot"/&gt;&lt;/svg&gt;</y:Resource></y:Resources></data>
</graphml>"##;

    fn document() -> Document {
        Document::parse(SOURCE, &NamespaceRegistry::with_builtin_dialects())
            .unwrap()
            .into_value()
    }

    #[test]
    fn test_canvas_and_layers() {
        let svg = SvgBuilder::new().with_margin(10.0).build().unwrap();
        let rendered = svg.render_document(&document());
        assert!(rendered.is_clean());

        let text = rendered.value().to_string();
        assert!(text.contains("viewBox=\"-10 -10 160 40\""));
        let containers = text.find("class=\"containers\"").unwrap();
        let nodes = text.find("class=\"nodes\"").unwrap();
        let edges = text.find("class=\"edges\"").unwrap();
        assert!(containers < nodes && nodes < edges);
    }

    #[test]
    fn test_output_is_well_formed_with_xlink() {
        let parsed = Document::parse(XLINKED, &NamespaceRegistry::with_builtin_dialects()).unwrap();
        assert!(parsed.is_clean(), "{:?}", parsed.diagnostics());
        let svg = SvgBuilder::new().build().unwrap();
        let text = svg.render_document(parsed.value()).into_value().to_string();

        let output = roxmltree::Document::parse(&text).unwrap();
        let reference = output
            .descendants()
            .find(|node| node.tag_name().name() == "use")
            .unwrap();
        assert_eq!(reference.attribute((ns::XLINK, "href")), Some("#n0_dot"));
    }

    #[test]
    fn test_background() {
        let style = StyleConfig::new(Some("#ff0000".to_string()));
        let svg = SvgBuilder::new().with_style(&style).build().unwrap();
        let text = svg.render_document(&document()).into_value().to_string();
        let background = text.find("<rect").unwrap();
        assert!(background < text.find("class=\"containers\"").unwrap());
    }

    #[test]
    fn test_invalid_background() {
        let style = StyleConfig::new(Some("nope".to_string()));
        let err = SvgBuilder::new().with_style(&style).build().unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_export_writes_document() {
        let mut svg = SvgBuilder::new().build().unwrap();
        let mut buffer = Vec::new();
        let diagnostics = svg.export_document(&document(), &mut buffer).unwrap();
        assert!(diagnostics.is_empty());
        assert!(String::from_utf8(buffer).unwrap().contains("<svg"));
    }
}
