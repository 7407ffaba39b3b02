//! Edge geometry.
//!
//! Edges are drawn from boundary to boundary, not center to center: each end
//! is pulled back along the edge by the node's radius plus half its stroke,
//! so arrow markers touch the visible outline of the node.

use weft_core::geometry::{Point, Segment};

/// The parts of a node that edge clipping depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeShape {
    pub center: Point,
    pub radius: f32,
    pub stroke_width: f32,
}

impl NodeShape {
    pub fn new(center: Point, radius: f32, stroke_width: f32) -> Self {
        Self {
            center,
            radius,
            stroke_width,
        }
    }

    /// Distance from the center to the outer edge of the stroke.
    pub fn clip_radius(&self) -> f32 {
        self.radius + self.stroke_width / 2.0
    }
}

/// Computes the visible segment between two nodes.
///
/// Coincident centers have no direction, so nothing is clipped and the
/// result is the zero-length segment at the shared center.
///
/// # Examples
///
/// ```
/// # use weft::path::{NodeShape, edge_path};
/// # use weft_core::geometry::Point;
/// let source = NodeShape::new(Point::new(0.0, 0.0), 10.0, 2.0);
/// let target = NodeShape::new(Point::new(100.0, 0.0), 10.0, 2.0);
/// let segment = edge_path(source, target);
/// assert_eq!(segment.x1(), 11.0);
/// assert_eq!(segment.x2(), 89.0);
/// ```
pub fn edge_path(source: NodeShape, target: NodeShape) -> Segment {
    let direction = target.center.sub_point(source.center).normalize();
    let start = source
        .center
        .add_point(direction.scale(source.clip_radius()));
    let end = target
        .center
        .sub_point(direction.scale(target.clip_radius()));
    Segment::new(start, end)
}

/// How an edge label is turned so it never reads upside down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelOrientation {
    /// Rotation about the label's bounding-box center.
    pub rotation_degrees: f32,
    /// Vertical offset of the text baseline from the path.
    pub baseline_offset: f32,
}

impl LabelOrientation {
    pub fn is_flipped(&self) -> bool {
        self.rotation_degrees != 0.0
    }
}

/// Labels on edges pointing leftwards are flipped by 180 degrees.
pub fn label_orientation(source: Point, target: Point) -> LabelOrientation {
    if target.x() < source.x() {
        LabelOrientation {
            rotation_degrees: 180.0,
            baseline_offset: 11.0,
        }
    } else {
        LabelOrientation {
            rotation_degrees: 0.0,
            baseline_offset: -2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_edge_path_clips_both_ends() {
        let source = NodeShape::new(Point::new(0.0, 0.0), 10.0, 2.0);
        let target = NodeShape::new(Point::new(100.0, 0.0), 10.0, 2.0);

        let segment = edge_path(source, target);
        assert_approx_eq!(f32, segment.x1(), 11.0);
        assert_approx_eq!(f32, segment.x2(), 89.0);
        assert_approx_eq!(f32, segment.y1(), 0.0);
        assert_approx_eq!(f32, segment.y2(), 0.0);
        assert_approx_eq!(f32, segment.length(), 78.0);
    }

    #[test]
    fn test_edge_path_diagonal() {
        let source = NodeShape::new(Point::new(0.0, 0.0), 5.0, 0.0);
        let target = NodeShape::new(Point::new(30.0, 40.0), 5.0, 0.0);

        let segment = edge_path(source, target);
        assert_approx_eq!(f32, segment.x1(), 3.0, epsilon = 0.0001);
        assert_approx_eq!(f32, segment.y1(), 4.0, epsilon = 0.0001);
        assert_approx_eq!(f32, segment.length(), 40.0, epsilon = 0.0001);
    }

    #[test]
    fn test_edge_path_coincident_centers() {
        let center = Point::new(7.0, 7.0);
        let segment = edge_path(
            NodeShape::new(center, 25.0, 1.0),
            NodeShape::new(center, 25.0, 1.0),
        );

        assert!(segment.start().is_finite());
        assert!(segment.end().is_finite());
        assert_eq!(segment.length(), 0.0);
    }

    #[test]
    fn test_label_orientation() {
        let left = Point::new(0.0, 0.0);
        let right = Point::new(50.0, 0.0);

        let flipped = label_orientation(right, left);
        assert_eq!(flipped.rotation_degrees, 180.0);
        assert_eq!(flipped.baseline_offset, 11.0);
        assert!(flipped.is_flipped());

        let upright = label_orientation(left, right);
        assert_eq!(upright.rotation_degrees, 0.0);
        assert_eq!(upright.baseline_offset, -2.0);

        // Vertical edges are not flipped
        assert!(!label_orientation(left, Point::new(0.0, 50.0)).is_flipped());
    }
}
