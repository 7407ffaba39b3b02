//! Geometric primitives for diagram layout and edge clipping.
//!
//! This module provides the geometric types shared by the reconciler, the
//! layout solvers and the rendering surfaces.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or vector) in layout space
//! - [`Size`] - Width and height dimensions
//! - [`Segment`] - A straight line between two points
//! - [`Transform`] - A zoom/pan view transform (translate then scale)
//!
//! # Coordinate System
//!
//! Weft uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```

use serde::Deserialize;

/// A 2D point representing a position in layout space.
///
/// Points use `f32` coordinates and double as 2D vectors for the force
/// simulation and for edge clipping.
///
/// # Examples
///
/// ```
/// # use weft_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
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

    /// Adds another point to this point, returning a new point
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

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// A zero-length vector has no direction; the zero vector is returned
    /// instead of dividing by zero, so callers never observe NaN.
    pub fn normalize(self) -> Self {
        let length = self.hypot();
        if length == 0.0 || !length.is_finite() {
            return Self::default();
        }
        self.scale(1.0 / length)
    }

    /// Returns true if both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns a square size with both sides equal to `side`
    pub fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the point at the center of an area of this size anchored at the origin
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// A straight line segment between two points.
///
/// Segments are what the rendering surfaces draw for edges once both ends
/// have been clipped to the node boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Segment {
    start: Point,
    end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the first endpoint
    pub fn start(self) -> Point {
        self.start
    }

    /// Returns the second endpoint
    pub fn end(self) -> Point {
        self.end
    }

    pub fn x1(self) -> f32 {
        self.start.x
    }

    pub fn y1(self) -> f32 {
        self.start.y
    }

    pub fn x2(self) -> f32 {
        self.end.x
    }

    pub fn y2(self) -> f32 {
        self.end.y
    }

    /// Euclidean length of the segment
    pub fn length(self) -> f32 {
        self.end.sub_point(self.start).hypot()
    }

    /// The point halfway between both endpoints
    pub fn midpoint(self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Formats the segment as SVG path data (`M x1,y1 L x2,y2`)
    pub fn to_path_data(self) -> String {
        format!(
            "M{},{} L{},{}",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
    }
}

/// A view transform applied to the whole diagram: translate, then scale.
///
/// This is what a zoom/pan behavior hands to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Transform {
    #[serde(default)]
    translate: Point,
    #[serde(default = "Transform::identity_scale")]
    scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn new(translate: Point, scale: f32) -> Self {
        Self { translate, scale }
    }

    /// The transform that leaves every point where it is
    pub fn identity() -> Self {
        Self {
            translate: Point::default(),
            scale: Self::identity_scale(),
        }
    }

    fn identity_scale() -> f32 {
        1.0
    }

    pub fn translate(self) -> Point {
        self.translate
    }

    pub fn scale(self) -> f32 {
        self.scale
    }

    /// Maps a point from layout space into view space
    pub fn apply(self, point: Point) -> Point {
        point.scale(self.scale).add_point(self.translate)
    }

    /// Formats the transform as an SVG `transform` attribute value
    pub fn to_svg_value(self) -> String {
        format!(
            "translate({},{}) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(10.0, 20.0);
        assert_eq!(point.x(), 10.0);
        assert_eq!(point.y(), 20.0);
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(3.0, 4.0);
        let p2 = Point::new(1.0, 2.0);

        assert_eq!(p1.add_point(p2), Point::new(4.0, 6.0));
        assert_eq!(p1.sub_point(p2), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_point_hypot() {
        assert_approx_eq!(f32, Point::new(3.0, 4.0).hypot(), 5.0);
    }

    #[test]
    fn test_point_normalize() {
        let unit = Point::new(0.0, -8.0).normalize();
        assert_approx_eq!(f32, unit.x(), 0.0);
        assert_approx_eq!(f32, unit.y(), -1.0);
    }

    #[test]
    fn test_point_normalize_zero_vector() {
        let unit = Point::default().normalize();
        assert!(unit.is_zero());
        assert!(unit.is_finite());
    }

    #[test]
    fn test_size_center() {
        let size = Size::new(200.0, 100.0);
        assert_eq!(size.center(), Point::new(100.0, 50.0));
        assert!(!size.is_zero());
        assert!(Size::default().is_zero());
    }

    #[test]
    fn test_segment_length_and_midpoint() {
        let segment = Segment::new(Point::new(11.0, 0.0), Point::new(89.0, 0.0));
        assert_approx_eq!(f32, segment.length(), 78.0);
        assert_eq!(segment.midpoint(), Point::new(50.0, 0.0));
        assert_eq!(segment.to_path_data(), "M11,0 L89,0");
    }

    #[test]
    fn test_transform_apply() {
        let transform = Transform::new(Point::new(10.0, 5.0), 2.0);
        assert_eq!(transform.apply(Point::new(1.0, 1.0)), Point::new(12.0, 7.0));
        assert_eq!(transform.to_svg_value(), "translate(10,5) scale(2)");
        assert_eq!(Transform::default(), Transform::identity());
    }
}
