//! Stroke and line-style definitions.
//!
//! yEd describes outlines with a `<y:BorderStyle>` (nodes) or `<y:LineStyle>`
//! (edges) element carrying `color`, `type` and `width`. [`StrokeDefinition`]
//! is the parsed form of either, and [`apply_stroke!`](crate::apply_stroke!)
//! writes it onto an SVG element.
//!
//! | yEd `type`      | [`StrokeStyle`]         | SVG `stroke-dasharray` |
//! |-----------------|-------------------------|------------------------|
//! | `line`          | `Solid`                 | (none)                 |
//! | `dashed`        | `Dashed`                | `6,2`                  |
//! | `dotted`        | `Dotted`                | `1,2`                  |
//! | `dashed_dotted` | `DashDot`               | `6,2,1,2`              |

use std::str::FromStr;

use crate::color::Color;

/// Line pattern of a stroke.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" | "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "dashed_dotted" | "dash-dot" => Ok(Self::DashDot),
            _ => Err(format!(
                "invalid line type `{s}`, valid values: line, dashed, dotted, dashed_dotted"
            )),
        }
    }
}

impl StrokeStyle {
    /// Returns the dash pattern scaled by the stroke width, or None for solid lines
    pub fn to_svg_value(self, width: f32) -> Option<String> {
        let pattern: &[f32] = match self {
            Self::Solid => return None,
            Self::Dashed => &[6.0, 2.0],
            Self::Dotted => &[1.0, 2.0],
            Self::DashDot => &[6.0, 2.0, 1.0, 2.0],
        };
        let unit = width.max(1.0);
        Some(
            pattern
                .iter()
                .map(|segment| format!("{}", segment * unit))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// A stroke definition for rendering lines and borders.
///
/// # Examples
///
/// ```
/// use trellis_core::draw::{StrokeDefinition, StrokeStyle};
/// use trellis_core::color::Color;
///
/// let mut stroke = StrokeDefinition::new(Color::new("#000000").unwrap(), 1.0);
/// stroke.set_style(StrokeStyle::Dashed);
/// assert_eq!(stroke.style(), StrokeStyle::Dashed);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Writes `stroke`, `stroke-width`, `stroke-opacity` and `stroke-dasharray`.
    pub fn assign_to<T: svg::Node>(&self, element: &mut T) {
        element.assign("stroke", self.color.to_opaque_string());
        element.assign("stroke-width", self.width);
        if self.color.alpha() < 1.0 {
            element.assign("stroke-opacity", self.color.alpha());
        }
        if let Some(dasharray) = self.style.to_svg_value(self.width) {
            element.assign("stroke-dasharray", dasharray);
        }
    }

    /// Returns a copy with a different style (builder style).
    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// # Examples
///
/// ```
/// use trellis_core::draw::StrokeDefinition;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::default();
/// let rect = svg_element::Rectangle::new().set("width", 10).set("height", 5);
/// let rect = trellis_core::apply_stroke!(rect, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke: &$crate::draw::StrokeDefinition = $stroke;
        let mut elem = $element;
        stroke.assign_to(&mut elem);
        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(stroke.style(), StrokeStyle::Solid);
    }

    #[test]
    fn test_stroke_style_from_yed_names() {
        assert_eq!(StrokeStyle::from_str("line").unwrap(), StrokeStyle::Solid);
        assert_eq!(StrokeStyle::from_str("dashed").unwrap(), StrokeStyle::Dashed);
        assert_eq!(StrokeStyle::from_str("dotted").unwrap(), StrokeStyle::Dotted);
        assert_eq!(
            StrokeStyle::from_str("dashed_dotted").unwrap(),
            StrokeStyle::DashDot
        );

        let result = StrokeStyle::from_str("zigzag");
        assert!(result.unwrap_err().contains("invalid line type"));
    }

    #[test]
    fn test_dasharray_scales_with_width() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(3.0), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(1.0).unwrap(), "6,2");
        assert_eq!(StrokeStyle::Dashed.to_svg_value(2.0).unwrap(), "12,4");
        assert_eq!(StrokeStyle::Dotted.to_svg_value(0.5).unwrap(), "1,2");
    }
}
