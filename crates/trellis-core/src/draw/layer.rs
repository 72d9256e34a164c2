//! Layer-based z-ordering for the assembled document.
//!
//! Element subtrees are produced independently and in document order, but
//! the painted result must show group backgrounds below nodes and edges above
//! them. [`LayeredOutput`] collects subtrees by [`RenderLayer`] and emits them
//! bottom to top.
//!
//! # Example
//!
//! ```
//! # use trellis_core::draw::{LayeredOutput, RenderLayer, RenderNode, Paint};
//! # use trellis_core::geometry::Geometry;
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Edge, RenderNode::Empty);
//! output.add_to_layer(
//!     RenderLayer::Node,
//!     RenderNode::rect(Geometry::new(0.0, 0.0, 10.0, 10.0), Paint::default()),
//! );
//!
//! let nodes = output.render();
//! assert_eq!(nodes.len(), 1);
//! ```

use log::trace;

use crate::draw::RenderNode;

/// Defines the rendering layers for SVG output.
///
/// The `Ord` derive uses declaration order: the first variant renders first
/// (bottom), the last renders last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Group and table backgrounds
    Container,
    /// Regular nodes
    Node,
    /// Edges and hyperedges
    Edge,
}

impl RenderLayer {
    /// Returns the name used as the SVG class of the layer group.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Container => "containers",
            Self::Node => "nodes",
            Self::Edge => "edges",
        }
    }
}

/// Render subtrees grouped by layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, RenderNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subtree to the specified layer. Empty subtrees are dropped.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: RenderNode) {
        if node.is_empty() {
            return;
        }
        self.items.push((layer, node));
    }

    /// Merges all items of another output into this one.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the subtrees of one layer in insertion order.
    pub fn layer(&self, layer: RenderLayer) -> impl Iterator<Item = &RenderNode> {
        self.items
            .iter()
            .filter(move |(item_layer, _)| *item_layer == layer)
            .map(|(_, node)| node)
    }

    /// Renders every non-empty layer as one SVG group, bottom to top.
    ///
    /// Within a layer, subtrees keep their insertion (document) order.
    pub fn render(self) -> Vec<Box<dyn svg::Node>> {
        let mut items = self.items;
        items.sort_by_key(|(layer, _)| *layer);

        let mut groups = Vec::new();
        let mut current: Option<(RenderLayer, svg::node::element::Group)> = None;
        for (layer, node) in items {
            let group = match current.take() {
                Some((current_layer, group)) if current_layer == layer => group,
                Some((finished_layer, group)) => {
                    trace!(layer = finished_layer.name(); "Layer rendered");
                    groups.push(Box::new(group) as Box<dyn svg::Node>);
                    svg::node::element::Group::new().set("class", layer.name())
                }
                None => svg::node::element::Group::new().set("class", layer.name()),
            };
            current = Some((layer, group.add(node.to_svg())));
        }
        if let Some((_, group)) = current {
            groups.push(Box::new(group));
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{draw::Paint, geometry::Geometry};

    fn rect() -> RenderNode {
        RenderNode::rect(Geometry::new(0.0, 0.0, 1.0, 1.0), Paint::default())
    }

    #[test]
    fn test_layer_order() {
        assert!(RenderLayer::Container < RenderLayer::Node);
        assert!(RenderLayer::Node < RenderLayer::Edge);
    }

    #[test]
    fn test_empty_nodes_are_dropped() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Node, RenderNode::Empty);
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_groups_by_layer_bottom_to_top() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Edge, rect());
        output.add_to_layer(RenderLayer::Node, rect());
        output.add_to_layer(RenderLayer::Edge, rect());

        let groups = output.render();
        assert_eq!(groups.len(), 2);
        assert!(groups[0].to_string().contains("class=\"nodes\""));
        assert!(groups[1].to_string().contains("class=\"edges\""));
        assert_eq!(groups[1].to_string().matches("<rect").count(), 2);
    }

    #[test]
    fn test_merge_and_layer_iter() {
        let mut first = LayeredOutput::new();
        first.add_to_layer(RenderLayer::Container, rect());
        let mut second = LayeredOutput::new();
        second.add_to_layer(RenderLayer::Container, rect());
        first.merge(second);
        assert_eq!(first.layer(RenderLayer::Container).count(), 2);
        assert_eq!(first.layer(RenderLayer::Edge).count(), 0);
    }
}
