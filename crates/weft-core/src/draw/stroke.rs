//! Stroke definitions.
//!
//! Node outlines and edge lines are both stroked; the stroke width also feeds
//! edge clipping, since an edge ends at the outer edge of the node's stroke.

use crate::color::Color;

/// A stroke definition for rendering lines and outlines.
///
/// # Examples
///
/// ```
/// use weft_core::draw::StrokeDefinition;
/// use weft_core::color::Color;
///
/// // Default stroke (black, 1px, opaque)
/// let stroke = StrokeDefinition::default();
/// assert_eq!(stroke.width(), 1.0);
///
/// let mut stroke = StrokeDefinition::new(Color::new("red").unwrap(), 2.0);
/// stroke.set_opacity(0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    opacity: f32,
}

impl StrokeDefinition {
    /// Creates a new opaque stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            opacity: 1.0,
        }
    }

    /// Returns the stroke color.
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the element opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Sets the opacity, clamped to `0.0..=1.0`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply stroke color and width to an SVG element.
///
/// Opacity is left to the caller since edges apply it to the whole element
/// rather than only to the stroke.
///
/// # Examples
///
/// ```
/// use weft_core::draw::StrokeDefinition;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::default();
/// let circle = svg_element::Circle::new().set("r", 25);
/// let circle = weft_core::apply_stroke!(circle, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-width", $stroke.width())
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.opacity(), 1.0);
        assert_eq!(*stroke.color(), Color::default());
    }

    #[test]
    fn test_stroke_setters() {
        let mut stroke = StrokeDefinition::default();
        stroke.set_color(Color::new("green").unwrap());
        stroke.set_width(4.0);
        stroke.set_opacity(1.5);

        assert_eq!(*stroke.color(), Color::new("green").unwrap());
        assert_eq!(stroke.width(), 4.0);
        assert_eq!(stroke.opacity(), 1.0);
    }
}
