//! In-memory SVG rendering surface.
//!
//! Elements are kept per kind in insertion order and emitted layer by layer:
//! marker definitions, then edges, their hit-test copies and labels, then
//! nodes on top. Everything but the definitions sits inside one viewport
//! group carrying the zoom transform.

mod text;

use std::{fmt, fs::File, io::Write, path::Path};

use indexmap::IndexMap;
use log::{error, info, warn};
use svg::{
    Document, Node,
    node::{
        Text as SvgText,
        element::{self as svg_element, Element},
    },
};

use weft_core::{
    apply_stroke,
    color::Color,
    draw::{MarkerDefinition, RenderLayer, StrokeDefinition},
    geometry::{Point, Segment, Size, Transform},
};

use crate::{
    config::StyleConfig,
    export,
    path::LabelOrientation,
    surface::{
        EdgeAttrs, ElementAttrs, ElementId, ElementKind, HoverAttrs, LabelAttrs, NodeAttrs,
        Placement, RenderSurface,
    },
};

/// Font size of node and edge labels, in points.
const LABEL_FONT_SIZE: u16 = 10;

#[derive(Debug, Clone)]
struct Placed<A, G> {
    attrs: A,
    geometry: Option<G>,
}

impl<A, G> Placed<A, G> {
    fn new(attrs: A) -> Self {
        Self {
            attrs,
            geometry: None,
        }
    }
}

/// A [`RenderSurface`] producing SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    style: StyleConfig,
    size: Size,
    zoomable: bool,
    transform: Transform,
    markers: IndexMap<String, MarkerDefinition>,
    nodes: IndexMap<ElementId, Placed<NodeAttrs, Point>>,
    edges: IndexMap<ElementId, Placed<EdgeAttrs, Segment>>,
    hovers: IndexMap<ElementId, Placed<HoverAttrs, Segment>>,
    labels: IndexMap<ElementId, Placed<LabelAttrs, (Segment, LabelOrientation)>>,
    cycles: u64,
}

impl SvgSurface {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Number of completed sync cycles since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of elements held for `kind`.
    pub fn count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Node => self.nodes.len(),
            ElementKind::Edge => self.edges.len(),
            ElementKind::EdgeHover => self.hovers.len(),
            ElementKind::EdgeLabel => self.labels.len(),
            ElementKind::Marker => self.markers.len(),
        }
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        match id.kind() {
            ElementKind::Node => self.nodes.contains_key(id),
            ElementKind::Edge => self.edges.contains_key(id),
            ElementKind::EdgeHover => self.hovers.contains_key(id),
            ElementKind::EdgeLabel => self.labels.contains_key(id),
            ElementKind::Marker => self.markers.contains_key(id.dom_id()),
        }
    }

    /// Stores `attrs` under `id`, keeping any geometry already placed.
    fn store(&mut self, id: &ElementId, attrs: &ElementAttrs) {
        let key = id.clone();
        match (id.kind(), attrs) {
            (ElementKind::Node, ElementAttrs::Node(attrs)) => {
                let entry = self
                    .nodes
                    .entry(key)
                    .or_insert_with(|| Placed::new(attrs.clone()));
                entry.attrs = attrs.clone();
            }
            (ElementKind::Edge, ElementAttrs::Edge(attrs)) => {
                let entry = self
                    .edges
                    .entry(key)
                    .or_insert_with(|| Placed::new(attrs.clone()));
                entry.attrs = attrs.clone();
            }
            (ElementKind::EdgeHover, ElementAttrs::EdgeHover(attrs)) => {
                let entry = self
                    .hovers
                    .entry(key)
                    .or_insert_with(|| Placed::new(attrs.clone()));
                entry.attrs = attrs.clone();
            }
            (ElementKind::EdgeLabel, ElementAttrs::EdgeLabel(attrs)) => {
                let entry = self
                    .labels
                    .entry(key)
                    .or_insert_with(|| Placed::new(attrs.clone()));
                entry.attrs = attrs.clone();
            }
            (kind, _) => {
                warn!(id:% = id, kind:? = kind; "Attributes do not match element kind, ignoring");
            }
        }
    }

    /// Builds the SVG document for the current state.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new()
            .set("width", self.size.width())
            .set("height", self.size.height())
            .set("viewBox", (0, 0, self.size.width(), self.size.height()));

        match self.style.background_color() {
            Ok(Some(color)) => {
                doc = doc.add(
                    svg_element::Rectangle::new()
                        .set("width", "100%")
                        .set("height", "100%")
                        .set("fill", &color),
                );
            }
            Ok(None) => {}
            Err(err) => warn!(err:%; "Ignoring invalid background color"),
        }

        let defs = self
            .markers
            .values()
            .fold(svg_element::Definitions::new(), |defs, marker| {
                defs.add(marker.to_svg())
            });
        doc = doc.add(defs.set("class", RenderLayer::Definitions.class_name()));

        let mut viewport = svg_element::Group::new().set("class", "viewport");
        if self.zoomable {
            viewport = viewport.set("transform", self.transform.to_svg_value());
        }

        viewport = viewport
            .add(self.render_edges())
            .add(self.render_hovers())
            .add(self.render_labels())
            .add(self.render_nodes());

        doc.add(viewport)
    }

    fn render_edges(&self) -> svg_element::Group {
        self.edges.iter().fold(
            svg_element::Group::new().set("class", RenderLayer::Edge.class_name()),
            |group, (id, edge)| {
                let stroke = stroke_of(&edge.attrs.stroke, edge.attrs.stroke_width);
                let mut path = svg_element::Path::new()
                    .set("id", id.dom_id())
                    .set("fill", "none")
                    .set("opacity", edge.attrs.opacity)
                    .set("d", path_data(edge.geometry));
                path = apply_stroke!(path, &stroke);
                if let Some(marker) = &edge.attrs.marker_end {
                    path = path.set("marker-end", format!("url(#{marker})"));
                }
                if let Some(marker) = &edge.attrs.marker_start {
                    path = path.set("marker-start", format!("url(#{marker})"));
                }
                group.add(path)
            },
        )
    }

    fn render_hovers(&self) -> svg_element::Group {
        self.hovers.iter().fold(
            svg_element::Group::new().set("class", RenderLayer::EdgeHover.class_name()),
            |group, (id, hover)| {
                let stroke = stroke_of(&hover.attrs.stroke, hover.attrs.stroke_width);
                let path = svg_element::Path::new()
                    .set("id", id.dom_id())
                    .set("fill", "none")
                    .set("opacity", hover.attrs.opacity)
                    .set("d", path_data(hover.geometry));
                group.add(apply_stroke!(path, &stroke))
            },
        )
    }

    fn render_labels(&self) -> svg_element::Group {
        let hidden = !self.style.show_edge_labels();
        let font_family = self.style.font_family();

        self.labels.iter().fold(
            svg_element::Group::new().set("class", RenderLayer::EdgeLabel.class_name()),
            |group, (id, label)| {
                let mut text_path = Element::new("textPath");
                text_path.assign("href", format!("#{}", label.attrs.path_id));
                text_path.assign("startOffset", "50%");
                text_path.assign("text-anchor", "middle");
                text_path.append(SvgText::new(label.attrs.text.as_str()));

                let mut text = svg_element::Text::new("")
                    .set("id", id.dom_id())
                    .set("font-family", font_family)
                    .set("font-size", LABEL_FONT_SIZE)
                    .add(text_path);

                if let Some((segment, orientation)) = label.geometry {
                    text = text.set("dy", orientation.baseline_offset);
                    if orientation.is_flipped() {
                        let center = label_center(&label.attrs.text, font_family, segment, orientation);
                        text = text.set(
                            "transform",
                            format!(
                                "rotate({} {} {})",
                                orientation.rotation_degrees,
                                center.x(),
                                center.y()
                            ),
                        );
                    }
                }
                if hidden {
                    text = text.set("visibility", "hidden");
                }
                group.add(text)
            },
        )
    }

    fn render_nodes(&self) -> svg_element::Group {
        self.nodes.iter().fold(
            svg_element::Group::new().set("class", RenderLayer::Node.class_name()),
            |group, (id, node)| {
                let stroke = stroke_of(&node.attrs.stroke, node.attrs.stroke_width);
                let fill = color_or(&node.attrs.fill, "white");
                let circle = svg_element::Circle::new()
                    .set("r", node.attrs.radius)
                    .set("fill", &fill);

                let mut node_group = svg_element::Group::new()
                    .set("id", id.dom_id())
                    .add(apply_stroke!(circle, &stroke));
                if let Some(position) = node.geometry {
                    node_group = node_group.set(
                        "transform",
                        format!("translate({},{})", position.x(), position.y()),
                    );
                }
                if let Some(label) = &node.attrs.label {
                    node_group = node_group.add(
                        svg_element::Text::new("")
                            .set("text-anchor", "middle")
                            .set("dominant-baseline", "central")
                            .set("font-family", self.style.font_family())
                            .set("font-size", LABEL_FONT_SIZE)
                            .add(SvgText::new(label.as_str())),
                    );
                }
                group.add(node_group)
            },
        )
    }

    /// Writes the document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Io`] if the file cannot be created or written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), export::Error> {
        let path = path.as_ref();
        info!(path:? = path; "Creating SVG file");

        let mut file = File::create(path).map_err(|err| {
            error!(path:? = path, err:%; "Failed to create SVG file");
            export::Error::Io(err)
        })?;

        write!(file, "{}", self.to_document()).map_err(|err| {
            error!(path:? = path, err:%; "Failed to write SVG content");
            export::Error::Io(err)
        })
    }
}

impl fmt::Display for SvgSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_document())
    }
}

impl RenderSurface for SvgSurface {
    fn reset(&mut self, size: Size, zoomable: bool) {
        self.size = size;
        self.zoomable = zoomable;
        self.transform = Transform::identity();
        self.markers.clear();
        self.nodes.clear();
        self.edges.clear();
        self.hovers.clear();
        self.labels.clear();
        self.cycles = 0;
    }

    fn define_marker(&mut self, marker: &MarkerDefinition) {
        self.markers
            .insert(marker.name().to_string(), marker.clone());
    }

    fn end_cycle(&mut self) {
        self.cycles += 1;
    }

    fn create(&mut self, id: &ElementId, attrs: &ElementAttrs) {
        self.store(id, attrs);
    }

    fn update(&mut self, id: &ElementId, attrs: &ElementAttrs) {
        if !self.contains(id) {
            warn!(id:% = id; "Updating an element that was never created");
        }
        self.store(id, attrs);
    }

    fn remove(&mut self, id: &ElementId) {
        let removed = match id.kind() {
            ElementKind::Node => self.nodes.shift_remove(id).is_some(),
            ElementKind::Edge => self.edges.shift_remove(id).is_some(),
            ElementKind::EdgeHover => self.hovers.shift_remove(id).is_some(),
            ElementKind::EdgeLabel => self.labels.shift_remove(id).is_some(),
            ElementKind::Marker => self.markers.shift_remove(id.dom_id()).is_some(),
        };
        if !removed {
            warn!(id:% = id; "Removing an element that does not exist");
        }
    }

    fn place(&mut self, id: &ElementId, placement: &Placement) {
        let placed = match (id.kind(), *placement) {
            (ElementKind::Node, Placement::Translate(position)) => self
                .nodes
                .get_mut(id)
                .map(|node| node.geometry = Some(position)),
            (ElementKind::Edge, Placement::Path(segment)) => self
                .edges
                .get_mut(id)
                .map(|edge| edge.geometry = Some(segment)),
            (ElementKind::EdgeHover, Placement::Path(segment)) => self
                .hovers
                .get_mut(id)
                .map(|hover| hover.geometry = Some(segment)),
            (
                ElementKind::EdgeLabel,
                Placement::Label {
                    segment,
                    orientation,
                },
            ) => self
                .labels
                .get_mut(id)
                .map(|label| label.geometry = Some((segment, orientation))),
            _ => None,
        };
        if placed.is_none() {
            warn!(id:% = id; "Cannot place element");
        }
    }

    fn zoom(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

fn path_data(segment: Option<Segment>) -> String {
    segment.map(Segment::to_path_data).unwrap_or_default()
}

fn color_or(value: &str, fallback: &str) -> Color {
    Color::new(value).unwrap_or_else(|err| {
        warn!(err:%; "Invalid color, using fallback");
        Color::new(fallback).unwrap_or_default()
    })
}

fn stroke_of(color: &str, width: f32) -> StrokeDefinition {
    StrokeDefinition::new(color_or(color, "black"), width)
}

/// Center of a label's bounding box, used as the rotation origin.
///
/// The text is centered on the segment midpoint and sits `baseline_offset`
/// below the path, so its box center is half a line height above that.
fn label_center(
    content: &str,
    font_family: &str,
    segment: Segment,
    orientation: LabelOrientation,
) -> Point {
    let size = text::measure(content, font_family, LABEL_FONT_SIZE);
    let direction = segment.end().sub_point(segment.start()).normalize();
    let normal = Point::new(-direction.y(), direction.x());
    segment
        .midpoint()
        .add_point(normal.scale(orientation.baseline_offset - size.height() / 2.0))
}

#[cfg(test)]
mod tests {
    use weft_core::identifier::Key;

    use super::*;
    use crate::path::label_orientation;

    fn surface() -> SvgSurface {
        let mut surface = SvgSurface::new(StyleConfig::default().with_show_edge_labels(true));
        surface.reset(Size::new(300.0, 200.0), true);
        for marker in MarkerDefinition::builtin() {
            surface.define_marker(&marker);
        }
        surface
    }

    fn edge_attrs() -> ElementAttrs {
        ElementAttrs::Edge(EdgeAttrs {
            stroke: "black".to_string(),
            stroke_width: 1.0,
            opacity: 1.0,
            marker_end: Some("vee".to_string()),
            marker_start: None,
        })
    }

    #[test]
    fn test_create_place_and_render() {
        let mut surface = surface();
        let node = ElementId::node(Key::new("a"));
        surface.create(
            &node,
            &ElementAttrs::Node(NodeAttrs {
                radius: 25.0,
                fill: "white".to_string(),
                stroke: "black".to_string(),
                stroke_width: 1.0,
                label: Some("Alpha".to_string()),
            }),
        );
        surface.place(&node, &Placement::Translate(Point::new(10.0, 20.0)));

        let edge = ElementId::edge(Key::new("a-b"));
        surface.create(&edge, &edge_attrs());
        surface.place(
            &edge,
            &Placement::Path(Segment::new(Point::new(0.0, 0.0), Point::new(5.0, 0.0))),
        );

        let rendered = surface.to_string();
        assert!(rendered.contains("id=\"node-a\""));
        assert!(rendered.contains("translate(10,20)"));
        assert!(rendered.contains("Alpha"));
        assert!(rendered.contains("id=\"edge-a-b\""));
        assert!(rendered.contains("M0,0 L5,0"));
        assert!(rendered.contains("url(#vee)"));
        assert!(rendered.contains("id=\"dot\""));
    }

    #[test]
    fn test_remove_deletes_element() {
        let mut surface = surface();
        let edge = ElementId::edge(Key::new("gone"));
        surface.create(&edge, &edge_attrs());
        assert_eq!(surface.count(ElementKind::Edge), 1);

        surface.remove(&edge);
        assert_eq!(surface.count(ElementKind::Edge), 0);
        assert!(!surface.to_string().contains("edge-gone"));
    }

    #[test]
    fn test_flipped_label_is_rotated() {
        let mut surface = surface();
        let label = ElementId::edge_label(Key::new("b-a"));
        surface.create(
            &label,
            &ElementAttrs::EdgeLabel(LabelAttrs {
                text: "b-a".to_string(),
                path_id: "edge-b-a".to_string(),
            }),
        );
        let source = Point::new(100.0, 0.0);
        let target = Point::new(0.0, 0.0);
        surface.place(
            &label,
            &Placement::Label {
                segment: Segment::new(source, target),
                orientation: label_orientation(source, target),
            },
        );

        let rendered = surface.to_string();
        assert!(rendered.contains("rotate(180"));
        assert!(rendered.contains("href=\"#edge-b-a\""));
        assert!(rendered.contains("startOffset=\"50%\""));
    }

    #[test]
    fn test_colliding_dom_ids_stay_separate() {
        let mut surface = surface();
        let spaced = ElementId::edge(Key::new("a b"));
        let dashed = ElementId::edge(Key::new("a-b"));
        surface.create(&spaced, &edge_attrs());
        surface.create(&dashed, &edge_attrs());
        surface.place(
            &spaced,
            &Placement::Path(Segment::new(Point::new(0.0, 0.0), Point::new(5.0, 0.0))),
        );
        surface.place(
            &dashed,
            &Placement::Path(Segment::new(Point::new(0.0, 9.0), Point::new(5.0, 9.0))),
        );

        assert_eq!(surface.count(ElementKind::Edge), 2);
        let rendered = surface.to_string();
        assert!(rendered.contains("M0,0 L5,0"));
        assert!(rendered.contains("M0,9 L5,9"));

        surface.remove(&spaced);
        assert!(surface.contains(&dashed));
        assert_eq!(surface.count(ElementKind::Edge), 1);
    }

    #[test]
    fn test_reset_clears_elements() {
        let mut surface = surface();
        surface.create(&ElementId::edge(Key::new("x")), &edge_attrs());
        surface.zoom(Transform::new(Point::new(5.0, 5.0), 2.0));
        surface.reset(Size::new(10.0, 10.0), false);

        assert_eq!(surface.count(ElementKind::Edge), 0);
        assert_eq!(surface.count(ElementKind::Marker), 0);
        assert_eq!(surface.transform, Transform::identity());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.svg");

        surface().write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
    }
}
