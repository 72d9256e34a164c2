//! Renderable output types.
//!
//! - [`RenderNode`] - The positioned, paintable tree every element kind builds
//! - [`XmlElement`] - Owned XML for embedded foreign content
//! - [`StrokeDefinition`] / [`FontSpec`] - Outline and text styling
//! - [`LayeredOutput`] - Z-ordered assembly of many subtrees

mod layer;
mod node;
mod stroke;
mod text;
mod xml;

pub use layer::{LayeredOutput, RenderLayer};
pub use node::{Group, Paint, RenderNode, TextNode};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{FontSpec, FontStyle, TextAnchor};
pub use xml::{XmlElement, XmlNode};
