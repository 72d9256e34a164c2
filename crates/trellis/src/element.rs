//! The element contract shared by every dialect kind.
//!
//! An element is one `<node>`, `<edge>` or `<hyperedge>` of the source
//! document, realized by a kind that a dialect registered in the
//! [`NamespaceRegistry`](crate::registry::NamespaceRegistry). Kinds are
//! written against [`ElementKind`]: a concrete attribute record plus the
//! rules to read it from markup and to build a render subtree from it.
//! [`Representation`] wraps such a record and exposes it through the
//! object-safe [`Element`] trait, which is what the orchestrator holds.
//!
//! # Lifecycle
//!
//! ```text
//! registry lookup -> construct(kind, id) -> parse_markup(markup) -> build_subtree(ctx)
//! ```
//!
//! `build_subtree` never mutates the element and may be called any number
//! of times; geometry edits in between (`set_bounds`, `translate`) are
//! reflected by the next build.

mod label;
mod representation;

pub use label::Label;
pub use representation::Representation;

use std::{any::Any, fmt};

use indexmap::IndexMap;

use trellis_core::{
    draw::{RenderLayer, RenderNode},
    geometry::{Geometry, GeometryPatch},
    identifier::Id,
};
use trellis_markup::{
    Markup, ResourceTable,
    error::{Diagnostic, Parsed},
};

/// Everything a kind may consult while building its subtree.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    resources: &'a ResourceTable,
    anchors: Option<&'a IndexMap<Id, Geometry>>,
}

impl<'a> BuildContext<'a> {
    pub fn new(resources: &'a ResourceTable) -> Self {
        Self {
            resources,
            anchors: None,
        }
    }

    /// Node bounds by identifier, used to resolve edge endpoints.
    pub fn with_anchors(mut self, anchors: &'a IndexMap<Id, Geometry>) -> Self {
        self.anchors = Some(anchors);
        self
    }

    pub fn resources(&self) -> &'a ResourceTable {
        self.resources
    }

    pub fn anchor(&self, id: Id) -> Option<Geometry> {
        self.anchors.and_then(|anchors| anchors.get(&id).copied())
    }
}

/// The object-safe capability set of a parsed element.
pub trait Element: fmt::Debug {
    fn id(&self) -> Id;

    /// The kind name this element was constructed under, e.g. `ShapeNode`.
    fn kind(&self) -> &'static str;

    /// Reads the attribute record from markup, replacing the stored one.
    ///
    /// Defects are returned as diagnostics; the stored record is always
    /// usable afterwards.
    fn parse_markup(&mut self, markup: Markup<'_, '_>) -> Vec<Diagnostic>;

    /// Current geometry; the zero rectangle for kinds without one.
    fn bounds(&self) -> Geometry;

    /// Writes only the fields present in `patch`.
    fn set_bounds(&mut self, patch: GeometryPatch);

    /// Shifts the geometry and every attached label.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Resolves positions given relative to other elements, once the
    /// document is assembled. Later `translate` calls then move them as
    /// part of this element only.
    fn attach(&mut self, anchors: &IndexMap<Id, Geometry>);

    /// Labels in display order.
    fn labels(&self) -> &[Label];

    /// Layer the subtree is painted on.
    fn layer(&self) -> RenderLayer;

    /// Builds the render subtree from the stored attributes.
    fn build_subtree(&self, ctx: &BuildContext<'_>) -> Parsed<RenderNode>;

    fn clone_box(&self) -> Box<dyn Element>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Element> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// The kind-specific side of an element: its attribute record.
///
/// Kinds with geometry return it from [`geometry`](ElementKind::geometry);
/// the provided `bounds`, `set_bounds` and `translate` then follow the
/// shared contract without further code.
pub trait ElementKind: fmt::Debug + Clone + Default + 'static {
    const LAYER: RenderLayer = RenderLayer::Node;

    /// Extracts the record from markup.
    fn parse(markup: Markup<'_, '_>, id: Id) -> Parsed<Self>;

    /// Builds the subtree for this record. Must not depend on anything but
    /// `self`, `id` and `ctx`.
    fn build(&self, id: Id, ctx: &BuildContext<'_>) -> Parsed<RenderNode>;

    fn geometry(&self) -> Option<&Geometry> {
        None
    }

    fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        None
    }

    fn labels(&self) -> &[Label] {
        &[]
    }

    fn labels_mut(&mut self) -> &mut [Label] {
        &mut []
    }

    fn bounds(&self) -> Geometry {
        self.geometry().copied().unwrap_or_else(Geometry::zero)
    }

    fn set_bounds(&mut self, patch: GeometryPatch) {
        if let Some(geometry) = self.geometry_mut() {
            *geometry = geometry.apply(patch);
        }
    }

    fn attach(&mut self, _anchors: &IndexMap<Id, Geometry>) {}

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(geometry) = self.geometry_mut() {
            *geometry = geometry.translate(dx, dy);
        }
        for label in self.labels_mut() {
            label.translate(dx, dy);
        }
    }
}
