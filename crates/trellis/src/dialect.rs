//! Built-in dialects.
//!
//! - [`graphml`] - The plain GraphML `node`, `edge` and `hyperedge` kinds
//! - [`yworks`] - yEd realizers: shapes, edges, groups, tables, UML and SVG nodes
//!
//! Each dialect exposes a `namespace()` function returning a fresh
//! [`Namespace`](crate::registry::Namespace) with all its kinds registered.

pub mod graphml;
pub mod yworks;
