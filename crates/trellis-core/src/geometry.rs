//! Geometric primitives for element placement.
//!
//! This module provides the geometric value types used throughout Trellis
//! for describing where a parsed element sits and how large it is.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in document space
//! - [`Size`] - Width and height dimensions
//! - [`Geometry`] - A positioned rectangle (`x`, `y`, `width`, `height`)
//! - [`GeometryPatch`] - A partial update to a [`Geometry`]
//! - [`Bounds`] - A bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! GraphML documents produced by yEd use the same convention as SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! A [`Geometry`] is anchored at its top-left corner.

use serde::Deserialize;

/// A 2D point representing a position in document coordinate space.
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Shifts the point by `dx`, `dy`.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// A positioned rectangle anchored at its top-left corner.
///
/// Every visually positioned element owns exactly one `Geometry`. It is a
/// plain value: copying it never aliases the element it came from.
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::Geometry;
/// let geometry = Geometry::new(10.0, 20.0, 100.0, 40.0);
/// assert_eq!(geometry.center().x(), 60.0);
/// assert_eq!(geometry.max_y(), 60.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Geometry {
    /// Creates a new geometry; negative dimensions are clamped to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Creates a geometry from an origin point and a size.
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The zero rectangle, used by elements without intrinsic geometry.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the top-left corner.
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the center point of the rectangle.
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn max_x(self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(self) -> f32 {
        self.y + self.height
    }

    /// Returns true if the rectangle has no area and sits at the origin.
    pub fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// Shifts the rectangle by `dx`, `dy`, keeping its size.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Shrinks the rectangle by the given insets.
    ///
    /// Dimensions never become negative.
    pub fn inset(self, insets: Insets) -> Self {
        Self::new(
            self.x + insets.left,
            self.y + insets.top,
            self.width - insets.horizontal_sum(),
            self.height - insets.vertical_sum(),
        )
    }

    /// Merges only the fields present in `patch`; absent fields are untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_core::geometry::{Geometry, GeometryPatch};
    /// let geometry = Geometry::new(1.0, 2.0, 3.0, 4.0);
    /// let patched = geometry.apply(GeometryPatch::new().with_width(30.0));
    /// assert_eq!(patched, Geometry::new(1.0, 2.0, 30.0, 4.0));
    /// ```
    pub fn apply(self, patch: GeometryPatch) -> Self {
        Self::new(
            patch.x.unwrap_or(self.x),
            patch.y.unwrap_or(self.y),
            patch.width.unwrap_or(self.width),
            patch.height.unwrap_or(self.height),
        )
    }

    /// Converts the rectangle into min/max bounds.
    pub fn to_bounds(self) -> Bounds {
        Bounds {
            min_x: self.x,
            min_y: self.y,
            max_x: self.max_x(),
            max_y: self.max_y(),
        }
    }
}

/// A partial update for a [`Geometry`].
///
/// Only the fields that were set are written by [`Geometry::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl GeometryPatch {
    /// Creates an empty patch that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the bounds outward by the given insets.
    pub fn expand(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left,
            min_y: self.min_y - insets.top,
            max_x: self.max_x + insets.right,
            max_y: self.max_y + insets.bottom,
        }
    }

    /// Extends the bounds to contain `point`.
    pub fn include_point(&self, point: Point) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            min_y: self.min_y.min(point.y),
            max_x: self.max_x.max(point.x),
            max_y: self.max_y.max(point.y),
        }
    }

    /// Converts back to a top-left anchored [`Geometry`].
    pub fn to_geometry(self) -> Geometry {
        Geometry::new(self.min_x, self.min_y, self.width(), self.height())
    }
}

/// Padding values for the four sides of a rectangle.
///
/// Deserializes from `{ top, right, bottom, left }` so it can be used
/// directly in configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Insets {
    #[serde(default)]
    top: f32,
    #[serde(default)]
    right: f32,
    #[serde(default)]
    bottom: f32,
    #[serde(default)]
    left: f32,
}

impl Insets {
    /// Creates insets in CSS order (top, right, bottom, left).
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates insets with the same value on every side.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Sum of left and right.
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }

    /// Returns true if every side is zero.
    pub fn is_zero(self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_point_translate() {
        let point = Point::new(1.0, 2.0).translate(3.0, -4.0);
        assert_eq!(point, Point::new(4.0, -2.0));
    }

    #[test]
    fn test_point_midpoint() {
        let mid = Point::new(0.0, 0.0).midpoint(Point::new(4.0, 6.0));
        assert_eq!(mid, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_geometry_clamps_negative_dimensions() {
        let geometry = Geometry::new(5.0, 5.0, -10.0, -1.0);
        assert_eq!(geometry.width(), 0.0);
        assert_eq!(geometry.height(), 0.0);
    }

    #[test]
    fn test_geometry_center_and_extent() {
        let geometry = Geometry::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(geometry.center(), Point::new(25.0, 40.0));
        assert_eq!(geometry.max_x(), 40.0);
        assert_eq!(geometry.max_y(), 60.0);
    }

    #[test]
    fn test_geometry_inset() {
        let geometry = Geometry::new(0.0, 0.0, 100.0, 50.0).inset(Insets::new(10.0, 5.0, 0.0, 5.0));
        assert_eq!(geometry, Geometry::new(5.0, 10.0, 90.0, 40.0));
    }

    #[test]
    fn test_geometry_inset_never_negative() {
        let geometry = Geometry::new(0.0, 0.0, 4.0, 4.0).inset(Insets::uniform(10.0));
        assert_eq!(geometry.width(), 0.0);
        assert_eq!(geometry.height(), 0.0);
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let geometry = Geometry::new(1.0, 2.0, 3.0, 4.0);
        assert!(GeometryPatch::new().is_empty());
        assert_eq!(geometry.apply(GeometryPatch::new()), geometry);
    }

    #[test]
    fn test_bounds_merge_and_expand() {
        let a = Geometry::new(0.0, 0.0, 10.0, 10.0).to_bounds();
        let b = Geometry::new(20.0, 5.0, 10.0, 10.0).to_bounds();
        let merged = a.merge(&b).expand(Insets::uniform(2.0));

        assert_approx_eq!(f32, merged.min_x(), -2.0);
        assert_approx_eq!(f32, merged.min_y(), -2.0);
        assert_approx_eq!(f32, merged.width(), 34.0);
        assert_approx_eq!(f32, merged.height(), 19.0);
    }

    #[test]
    fn test_bounds_include_point() {
        let bounds = Geometry::new(0.0, 0.0, 1.0, 1.0)
            .to_bounds()
            .include_point(Point::new(-5.0, 8.0));
        assert_eq!(bounds.to_geometry(), Geometry::new(-5.0, 0.0, 6.0, 8.0));
    }

    #[test]
    fn test_insets_sums() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal_sum(), 6.0);
        assert_eq!(insets.vertical_sum(), 4.0);
        assert!(!insets.is_zero());
        assert!(Insets::default().is_zero());
    }

    fn small() -> impl Strategy<Value = f32> {
        (-1000i32..1000).prop_map(|v| v as f32)
    }

    proptest! {
        #[test]
        fn prop_patch_touches_only_present_fields(
            x in small(), y in small(), w in 0i32..1000, h in 0i32..1000,
            px in proptest::option::of(small()),
            pw in proptest::option::of((0i32..1000).prop_map(|v| v as f32)),
        ) {
            let geometry = Geometry::new(x, y, w as f32, h as f32);
            let patch = GeometryPatch { x: px, y: None, width: pw, height: None };
            let patched = geometry.apply(patch);

            prop_assert_eq!(patched.x(), px.unwrap_or(x));
            prop_assert_eq!(patched.y(), y);
            prop_assert_eq!(patched.width(), pw.unwrap_or(w as f32));
            prop_assert_eq!(patched.height(), h as f32);
        }

        #[test]
        fn prop_translate_is_additive(
            x in small(), y in small(),
            dx1 in small(), dy1 in small(), dx2 in small(), dy2 in small(),
        ) {
            let geometry = Geometry::new(x, y, 10.0, 10.0);
            let twice = geometry.translate(dx1, dy1).translate(dx2, dy2);
            let once = geometry.translate(dx1 + dx2, dy1 + dy2);
            prop_assert_eq!(twice, once);
        }
    }
}
