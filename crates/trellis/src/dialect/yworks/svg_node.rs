//! `<y:SVGNode>`: a node drawn with an SVG image from the resource table.

use trellis_core::{
    draw::{Group, RenderNode, XmlElement},
    geometry::Geometry,
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, Markup, Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, ns},
};

use super::NodeAppearance;
use crate::{
    element::{BuildContext, ElementKind, Label},
    fragment::{self, FragmentError},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgNode {
    appearance: NodeAppearance,
    resource: Option<String>,
    resource_span: Option<Span>,
}

impl SvgNode {
    pub fn appearance(&self) -> &NodeAppearance {
        &self.appearance
    }

    /// Identifier of the `<y:Resource>` holding the image.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    fn resource_diagnostic(&self, id: Id, message: String) -> Diagnostic {
        let diagnostic = Diagnostic::error(message)
            .with_element(id)
            .with_help("the image is left out of the output");
        match self.resource_span {
            Some(span) => diagnostic.with_span(span, "referenced here"),
            None => diagnostic,
        }
    }

    /// Places the fragment's root over the node's bounds.
    fn fit(&self, root: &mut XmlElement) {
        let bounds = self.appearance.geometry;
        if root.attribute("viewBox").is_none() {
            let natural = |name| {
                root.attribute(name)
                    .and_then(|value| value.trim_end_matches("px").trim().parse::<f32>().ok())
            };
            if let (Some(width), Some(height)) = (natural("width"), natural("height")) {
                root.set_attribute("viewBox", format!("0 0 {width} {height}"));
            }
        }
        root.set_attribute("x", bounds.x().to_string());
        root.set_attribute("y", bounds.y().to_string());
        root.set_attribute("width", bounds.width().to_string());
        root.set_attribute("height", bounds.height().to_string());
        root.set_attribute("preserveAspectRatio", "none");
    }
}

impl ElementKind for SvgNode {
    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let Some(realizer) = markup.realizer() else {
            return collector.finish(Self::default());
        };

        let appearance = NodeAppearance::parse(realizer, id, &mut collector);
        let content = markup::child(realizer, ns::YWORKS, "SVGModel")
            .and_then(|model| markup::child(model, ns::YWORKS, "SVGContent"));
        let resource = content.and_then(|content| AttributeReader::new(content).str("refid"));
        if resource.is_none() {
            collector.emit(
                AttributeReader::new(content.unwrap_or(realizer))
                    .for_element(id)
                    .diagnostic(format!("SVG node `{id}` does not reference a resource"))
                    .with_code(ErrorCode::E300)
                    .with_help("add <y:SVGModel><y:SVGContent refid=\"...\"/></y:SVGModel>"),
            );
        }

        collector.finish(Self {
            appearance,
            resource: resource.map(str::to_string),
            resource_span: content.map(Span::of),
        })
    }

    fn build(&self, id: Id, ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        let mut group = Group::new().with_id(id.to_mask()).with_class("svg-node");
        let mut diagnostics = Vec::new();

        if let Some(resource) = &self.resource {
            match ctx.resources().get(resource) {
                None => diagnostics.push(
                    self.resource_diagnostic(id, format!("unknown resource `{resource}`"))
                        .with_code(ErrorCode::E301),
                ),
                Some(payload) => match fragment::parse_fragment(payload) {
                    Ok(mut root) => {
                        fragment::mask_identifiers(&mut root, &id.to_mask());
                        self.fit(&mut root);
                        group.push(RenderNode::Embedded(root));
                    }
                    Err(err) => {
                        let code = match err {
                            FragmentError::Xml(_) => ErrorCode::E302,
                            FragmentError::MissingRoot => ErrorCode::E303,
                        };
                        diagnostics.push(
                            self.resource_diagnostic(id, format!("resource `{resource}`: {err}"))
                                .with_code(code),
                        );
                    }
                },
            }
        }

        self.appearance.push_labels(&mut group);
        let node = if group.children.is_empty() {
            RenderNode::Empty
        } else {
            RenderNode::Group(group)
        };
        diagnostics
            .into_iter()
            .fold(Parsed::clean(node), Parsed::with_diagnostic)
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
    use super::*;
    use crate::dialect::yworks::test_support::parse_realizer;
    use trellis_markup::ResourceTable;

    const NODE: &str = r#"<y:SVGNode>
      <y:Geometry x="10" y="20" width="64" height="32"/>
      <y:NodeLabel>cloud</y:NodeLabel>
      <y:SVGNodeProperties usingVisualBounds="true"/>
      <y:SVGModel svgBoundsPolicy="0"><y:SVGContent refid="1"/></y:SVGModel>
    </y:SVGNode>"#;

    const IMAGE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="32px" height="16px">
      <defs><linearGradient id="g"/></defs>
      <rect width="32" height="16" fill="url(#g)"/>
    </svg>"##;

    fn embedded(node: &RenderNode) -> Option<&XmlElement> {
        node.children().iter().find_map(|child| match child {
            RenderNode::Embedded(xml) => Some(xml),
            _ => None,
        })
    }

    #[test]
    fn test_parse_resource_reference() {
        let parsed = parse_realizer::<SvgNode>(NODE);
        assert!(parsed.is_clean());
        assert_eq!(parsed.value().resource(), Some("1"));
        assert_eq!(parsed.value().labels()[0].text(), "cloud");
    }

    #[test]
    fn test_missing_reference() {
        let parsed = parse_realizer::<SvgNode>(&NODE.replace(r#" refid="1""#, ""));
        assert_eq!(parsed.value().resource(), None);
        assert_eq!(parsed.diagnostics()[0].code(), Some(ErrorCode::E300));
    }

    #[test]
    fn test_build_masks_and_fits_image() {
        let node = parse_realizer::<SvgNode>(NODE).into_value();
        let mut resources = ResourceTable::new();
        resources.insert("1", IMAGE);

        let built = node.build(Id::new("n0"), &BuildContext::new(&resources));
        assert!(built.is_clean());
        let root = embedded(built.value()).unwrap();
        assert_eq!(root.attribute("viewBox"), Some("0 0 32 16"));
        assert_eq!(root.attribute("x"), Some("10"));
        assert_eq!(root.attribute("width"), Some("64"));
        assert_eq!(root.attribute("preserveAspectRatio"), Some("none"));

        let svg = built.value().to_svg().to_string();
        assert!(svg.contains("id=\"n0_g\""));
        assert!(svg.contains("url(#n0_g)"));
    }

    #[test]
    fn test_unknown_resource_builds_labels_only() {
        let node = parse_realizer::<SvgNode>(NODE).into_value();
        let resources = ResourceTable::new();
        let built = node.build(Id::new("n0"), &BuildContext::new(&resources));
        assert!(embedded(built.value()).is_none());
        assert_eq!(built.diagnostics()[0].code(), Some(ErrorCode::E301));
        assert!(built.diagnostics()[0].span().is_some());
    }

    #[test]
    fn test_broken_payloads() {
        let node = parse_realizer::<SvgNode>(
            r#"<y:SVGNode><y:Geometry x="0" y="0" width="1" height="1"/>
               <y:SVGModel><y:SVGContent refid="1"/></y:SVGModel></y:SVGNode>"#,
        )
        .into_value();
        for (payload, code) in [
            ("<svg><g></svg>", ErrorCode::E302),
            ("<png/>", ErrorCode::E303),
        ] {
            let mut resources = ResourceTable::new();
            resources.insert("1", payload);
            let built = node.build(Id::new("n0"), &BuildContext::new(&resources));
            assert_eq!(built.value(), &RenderNode::Empty);
            assert_eq!(built.diagnostics()[0].code(), Some(code));
        }
    }
}
