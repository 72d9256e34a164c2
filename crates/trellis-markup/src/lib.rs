//! Markup access and diagnostics for Trellis.
//!
//! This crate sits between the raw GraphML text and the element model:
//!
//! - [`markup`] parses the document and offers defaulting attribute readers.
//! - [`resource`] holds the document-level table of embedded payloads.
//! - [`error`] defines [`Diagnostic`](error::Diagnostic) and the
//!   [`Parsed`](error::Parsed) result that carries them.

pub mod error;
pub mod markup;
pub mod resource;

mod span;

pub use markup::{AttributeReader, KeyTable, Markup, MarkupError};
pub use resource::ResourceTable;
pub use span::Span;
