//! Group realizers: `<y:GroupNode>` and the collapsible `<y:ProxyAutoBoundsNode>`.

use roxmltree::Node;

use trellis_core::{
    draw::{Group, RenderLayer, RenderNode},
    geometry::{Geometry, Insets},
    identifier::Id,
};
use trellis_markup::{
    AttributeReader, Markup,
    error::{DiagnosticCollector, ErrorCode, Parsed},
    markup::{self, ns},
};

use super::{
    NodeAppearance, parse_insets,
    shape::{ShapeType, parse_shape},
};
use crate::element::{BuildContext, ElementKind, Label};

/// A container drawn behind the nodes of its nested graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    appearance: NodeAppearance,
    shape: ShapeType,
    closed: bool,
    insets: Insets,
}

impl GroupNode {
    fn parse_realizer(realizer: Node<'_, '_>, id: Id, collector: &mut DiagnosticCollector) -> Self {
        let closed = markup::child(realizer, ns::YWORKS, "State")
            .is_some_and(|state| AttributeReader::new(state).bool_or("closed", false));
        Self {
            appearance: NodeAppearance::parse(realizer, id, collector),
            shape: parse_shape(realizer, id, ShapeType::RoundRectangle, collector),
            closed,
            insets: parse_insets(markup::child(realizer, ns::YWORKS, "Insets"), collector),
        }
    }

    pub fn appearance(&self) -> &NodeAppearance {
        &self.appearance
    }

    /// Whether the group is shown folded.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Padding between the group border and its content.
    pub fn insets(&self) -> Insets {
        self.insets
    }
}

impl ElementKind for GroupNode {
    const LAYER: RenderLayer = RenderLayer::Container;

    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let group = match markup.realizer() {
            Some(realizer) => Self::parse_realizer(realizer, id, &mut collector),
            None => Self::default(),
        };
        collector.finish(group)
    }

    fn build(&self, id: Id, _ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        let class = if self.closed { "group closed" } else { "group" };
        let mut group = Group::new().with_id(id.to_mask()).with_class(class);
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

/// A group with alternative realizations, typically open and folded.
///
/// Geometry queries, patches and translation apply to the active realizer
/// only; the inactive ones keep their own geometry for when they are
/// switched to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyAutoBoundsNode {
    realizers: Vec<GroupNode>,
    active: usize,
}

impl ProxyAutoBoundsNode {
    pub fn realizers(&self) -> &[GroupNode] {
        &self.realizers
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Selects the active realizer; returns false and keeps the current one
    /// if `index` is out of range.
    pub fn set_active_index(&mut self, index: usize) -> bool {
        if index >= self.realizers.len() {
            return false;
        }
        self.active = index;
        true
    }

    pub fn active(&self) -> Option<&GroupNode> {
        self.realizers.get(self.active)
    }

    fn active_mut(&mut self) -> Option<&mut GroupNode> {
        self.realizers.get_mut(self.active)
    }
}

impl ElementKind for ProxyAutoBoundsNode {
    const LAYER: RenderLayer = RenderLayer::Container;

    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self> {
        let mut collector = DiagnosticCollector::new();
        let Some(realizers) = markup
            .realizer()
            .and_then(|realizer| markup::child(realizer, ns::YWORKS, "Realizers"))
        else {
            collector.emit(
                AttributeReader::new(markup.realizer().unwrap_or(markup.element()))
                    .for_element(id)
                    .diagnostic(format!("collapsible group `{id}` has no <y:Realizers>"))
                    .with_code(ErrorCode::E102),
            );
            return collector.finish(Self::default());
        };

        let reader = AttributeReader::new(realizers).for_element(id);
        let requested = reader.usize_or("active", 0, &mut collector);
        let groups: Vec<GroupNode> = realizers
            .children()
            .filter(|child| {
                markup::is_element(*child, ns::YWORKS, "GroupNode")
                    || markup::is_element(*child, ns::YWORKS, "GenericGroupNode")
            })
            .map(|child| GroupNode::parse_realizer(child, id, &mut collector))
            .collect();

        let active = if requested < groups.len() {
            requested
        } else {
            collector.emit(
                reader
                    .diagnostic(format!(
                        "active realizer {requested} of `{id}` is out of range (0..{})",
                        groups.len()
                    ))
                    .with_code(ErrorCode::E203)
                    .with_help("the first realizer is used"),
            );
            0
        };

        collector.finish(Self {
            realizers: groups,
            active,
        })
    }

    fn build(&self, id: Id, ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        match self.active() {
            Some(group) => group.build(id, ctx),
            None => Parsed::clean(RenderNode::Empty),
        }
    }

    fn geometry(&self) -> Option<&Geometry> {
        self.active().and_then(GroupNode::geometry)
    }

    fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        self.active_mut().and_then(GroupNode::geometry_mut)
    }

    fn labels(&self) -> &[Label] {
        self.active().map(GroupNode::labels).unwrap_or_default()
    }

    fn labels_mut(&mut self) -> &mut [Label] {
        match self.active_mut() {
            Some(group) => group.labels_mut(),
            None => &mut [],
        }
    }
}
