//! Color handling for Trellis documents
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. yEd writes colors as `#RRGGBB` or `#RRGGBBAA`, both
//! of which are valid CSS hex colors.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "#ff000080", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use trellis_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let translucent = Color::new("#FFCC0080").unwrap();
    /// assert!(translucent.alpha() < 1.0);
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str.trim()) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates a new color with the specified alpha value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns true if the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.alpha() <= 0.0
    }

    /// Returns the color without its alpha channel, suitable for `fill`/`stroke`.
    ///
    /// SVG 1.1 renderers do not all accept 8-digit hex colors, so the alpha is
    /// emitted separately through the matching `*-opacity` attribute.
    pub fn to_opaque_string(self) -> String {
        self.with_alpha(1.0).to_string()
    }

    pub fn white() -> Self {
        Self::new("white").expect("'white' is a valid CSS color")
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_opaque_string())
    }
}
