//! Arrow marker definitions.
//!
//! Edges reference markers by name for their start (arrowtail) and end
//! (arrowhead). Two markers exist on every freshly reset surface: `vee`, the
//! default arrowhead, and `dot`.

use svg::node::element::{Circle, Marker, Path};

/// The drawing placed inside a marker's `0 -5 10 10` view box.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerShape {
    /// A filled path, given as SVG path data
    Path(String),
    /// A filled circle
    Circle { cx: f32, cy: f32, r: f32 },
}

/// A named marker that edges can reference as arrowhead or arrowtail.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDefinition {
    name: String,
    width: f32,
    height: f32,
    ref_x: f32,
    ref_y: f32,
    shape: MarkerShape,
}

impl MarkerDefinition {
    pub fn new(
        name: impl Into<String>,
        width: f32,
        height: f32,
        ref_x: f32,
        ref_y: f32,
        shape: MarkerShape,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            ref_x,
            ref_y,
            shape,
        }
    }

    /// The filled triangular arrowhead used by default.
    pub fn vee() -> Self {
        Self::new(
            "vee",
            12.0,
            12.0,
            10.0,
            0.0,
            MarkerShape::Path("M0,-5 L10,0 L0,5 L3,0".to_string()),
        )
    }

    /// A round dot marker.
    pub fn dot() -> Self {
        Self::new(
            "dot",
            7.0,
            7.0,
            0.0,
            0.0,
            MarkerShape::Circle {
                cx: 5.0,
                cy: 0.0,
                r: 5.0,
            },
        )
    }

    /// The markers every reset surface starts with.
    pub fn builtin() -> [Self; 2] {
        [Self::vee(), Self::dot()]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &MarkerShape {
        &self.shape
    }

    /// Builds the SVG `<marker>` element for this definition.
    pub fn to_svg(&self) -> Marker {
        let marker = Marker::new()
            .set("id", self.name.as_str())
            .set("viewBox", "0 -5 10 10")
            .set("refX", self.ref_x)
            .set("refY", self.ref_y)
            .set("markerWidth", self.width)
            .set("markerHeight", self.height)
            .set("orient", "auto");

        match &self.shape {
            MarkerShape::Path(data) => marker.add(
                Path::new()
                    .set("d", data.as_str())
                    .set("stroke-width", "0px"),
            ),
            MarkerShape::Circle { cx, cy, r } => marker.add(
                Circle::new()
                    .set("cx", *cx)
                    .set("cy", *cy)
                    .set("r", *r)
                    .set("stroke-width", "0px"),
            ),
        }
    }
}
