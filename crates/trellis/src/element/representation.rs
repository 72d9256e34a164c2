//! Generic [`Element`] implementation over an [`ElementKind`] record.

use std::any::Any;

use indexmap::IndexMap;
use log::trace;

use trellis_core::{
    draw::{RenderLayer, RenderNode},
    geometry::{Geometry, GeometryPatch},
    identifier::Id,
};
use trellis_markup::{
    Markup,
    error::{Diagnostic, Parsed},
};

use super::{BuildContext, Element, ElementKind, Label};

/// An element of kind `K`: identity plus the kind's attribute record.
#[derive(Debug, Clone)]
pub struct Representation<K: ElementKind> {
    id: Id,
    kind: &'static str,
    attributes: K,
}

impl<K: ElementKind> Representation<K> {
    /// Creates an element with the kind's default record.
    pub fn new(id: Id, kind: &'static str) -> Self {
        Self {
            id,
            kind,
            attributes: K::default(),
        }
    }

    /// Constructor stored in a namespace's kind table.
    pub fn construct(id: Id, kind: &'static str) -> Box<dyn Element> {
        Box::new(Self::new(id, kind))
    }

    pub fn attributes(&self) -> &K {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut K {
        &mut self.attributes
    }

    /// Builds from `attributes` if given, otherwise from the stored record.
    pub fn build_subtree_with(
        &self,
        attributes: Option<&K>,
        ctx: &BuildContext<'_>,
    ) -> Parsed<RenderNode> {
        attributes
            .unwrap_or(&self.attributes)
            .build(self.id, ctx)
    }
}

impl<K: ElementKind> Element for Representation<K> {
    fn id(&self) -> Id {
        self.id
    }

    fn kind(&self) -> &'static str {
        self.kind
    }

    fn parse_markup(&mut self, markup: Markup<'_, '_>) -> Vec<Diagnostic> {
        trace!(id = self.id.to_string(), kind = self.kind; "Parsing element markup");
        let (attributes, diagnostics) = K::parse(markup, self.id).into_parts();
        self.attributes = attributes;
        diagnostics
    }

    fn bounds(&self) -> Geometry {
        self.attributes.bounds()
    }

    fn set_bounds(&mut self, patch: GeometryPatch) {
        self.attributes.set_bounds(patch);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.attributes.translate(dx, dy);
    }

    fn attach(&mut self, anchors: &IndexMap<Id, Geometry>) {
        self.attributes.attach(anchors);
    }

    fn labels(&self) -> &[Label] {
        self.attributes.labels()
    }

    fn layer(&self) -> RenderLayer {
        K::LAYER
    }

    fn build_subtree(&self, ctx: &BuildContext<'_>) -> Parsed<RenderNode> {
        self.build_subtree_with(None, ctx)
    }

    fn clone_box(&self) -> Box<dyn Element> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
