//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types shared by every Trellis crate:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, insets and element rectangles ([`geometry`] module)
//! - **Draw**: The renderable output tree and its SVG conversion ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
