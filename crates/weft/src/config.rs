//! Configuration types for Weft diagrams.
//!
//! All types implement [`serde::Deserialize`] with defaults for every field,
//! so a configuration file only needs to name what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining diagram and style settings.
//! - [`DiagramConfig`] - Canvas size, layout scheduling and reconciliation behavior.
//! - [`IterationSchedule`] - The warm-up / cooling / settling iteration budgets.
//! - [`StyleConfig`] - Visual options interpreted by rendering surfaces.
//!
//! # Example
//!
//! ```
//! # use weft::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.diagram().width(), 200.0);
//! assert!(config.style().background_color().unwrap().is_none());
//! ```

use serde::Deserialize;

use weft_core::{
    color::{Color, ColorError},
    geometry::Size,
};

/// Top-level configuration combining diagram and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Diagram configuration section.
    #[serde(default)]
    diagram: DiagramConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its two sections.
    pub fn new(diagram: DiagramConfig, style: StyleConfig) -> Self {
        Self { diagram, style }
    }

    /// Returns the diagram configuration.
    pub fn diagram(&self) -> &DiagramConfig {
        &self.diagram
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Iteration budgets for the three layout phases.
///
/// The solver first relaxes the unconstrained forces (warm-up), then applies
/// user constraints while cooling, then settles with overlap avoidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IterationSchedule {
    #[serde(default = "IterationSchedule::default_warmup")]
    warmup: u32,
    #[serde(default = "IterationSchedule::default_cool")]
    cool: u32,
    #[serde(default = "IterationSchedule::default_settle")]
    settle: u32,
}

impl IterationSchedule {
    pub fn new(warmup: u32, cool: u32, settle: u32) -> Self {
        Self {
            warmup,
            cool,
            settle,
        }
    }

    fn default_warmup() -> u32 {
        10
    }

    fn default_cool() -> u32 {
        20
    }

    fn default_settle() -> u32 {
        20
    }

    pub fn warmup(self) -> u32 {
        self.warmup
    }

    pub fn cool(self) -> u32 {
        self.cool
    }

    pub fn settle(self) -> u32 {
        self.settle
    }

    /// Total number of iterations across all phases.
    pub fn total(self) -> u32 {
        self.warmup + self.cool + self.settle
    }
}

impl Default for IterationSchedule {
    fn default() -> Self {
        Self::new(
            Self::default_warmup(),
            Self::default_cool(),
            Self::default_settle(),
        )
    }
}

/// Diagram behavior: canvas size, layout scheduling and cache policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    width: f32,
    height: f32,
    zoomable: bool,
    /// Extra room added to each node's diameter when sizing it for the solver.
    node_padding: f32,
    avoid_overlaps: bool,
    /// Draw after every solver tick instead of only once the layout ends.
    show_layout_steps: bool,
    /// Re-create the layout session on every redraw instead of only on render.
    init_layout_on_redraw: bool,
    /// Reference radius used when expanding `circle` constraints.
    circle_radius: f32,
    schedule: IterationSchedule,
    /// Drop cached wrappers whose key was absent for this many redraws.
    prune_after: Option<u64>,
    /// Animation duration in milliseconds for surfaces that animate updates.
    transition_duration: u64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 200.0,
            zoomable: true,
            node_padding: 6.0,
            avoid_overlaps: true,
            show_layout_steps: true,
            init_layout_on_redraw: false,
            circle_radius: 300.0,
            schedule: IterationSchedule::default(),
            prune_after: None,
            transition_duration: 500,
        }
    }
}

impl DiagramConfig {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the canvas size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn zoomable(&self) -> bool {
        self.zoomable
    }

    pub fn node_padding(&self) -> f32 {
        self.node_padding
    }

    pub fn avoid_overlaps(&self) -> bool {
        self.avoid_overlaps
    }

    pub fn show_layout_steps(&self) -> bool {
        self.show_layout_steps
    }

    pub fn init_layout_on_redraw(&self) -> bool {
        self.init_layout_on_redraw
    }

    pub fn circle_radius(&self) -> f32 {
        self.circle_radius
    }

    pub fn schedule(&self) -> IterationSchedule {
        self.schedule
    }

    pub fn prune_after(&self) -> Option<u64> {
        self.prune_after
    }

    pub fn transition_duration(&self) -> u64 {
        self.transition_duration
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_zoomable(mut self, zoomable: bool) -> Self {
        self.zoomable = zoomable;
        self
    }

    pub fn with_node_padding(mut self, padding: f32) -> Self {
        self.node_padding = padding;
        self
    }

    pub fn with_avoid_overlaps(mut self, avoid_overlaps: bool) -> Self {
        self.avoid_overlaps = avoid_overlaps;
        self
    }

    pub fn with_show_layout_steps(mut self, show: bool) -> Self {
        self.show_layout_steps = show;
        self
    }

    pub fn with_init_layout_on_redraw(mut self, init: bool) -> Self {
        self.init_layout_on_redraw = init;
        self
    }

    pub fn with_circle_radius(mut self, radius: f32) -> Self {
        self.circle_radius = radius;
        self
    }

    pub fn with_schedule(mut self, schedule: IterationSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_prune_after(mut self, redraws: Option<u64>) -> Self {
        self.prune_after = redraws;
        self
    }
}

/// Visual styling interpreted by rendering surfaces.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] for the canvas, as a color string.
    #[serde(default)]
    background_color: Option<String>,

    /// Render edge labels visible instead of revealing them on hover.
    #[serde(default)]
    show_edge_labels: bool,

    /// Font family used to measure and render labels.
    #[serde(default)]
    font_family: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, ColorError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
    }

    pub fn show_edge_labels(&self) -> bool {
        self.show_edge_labels
    }

    /// Returns the label font family, defaulting to `sans-serif`.
    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or("sans-serif")
    }

    pub fn with_show_edge_labels(mut self, show: bool) -> Self {
        self.show_edge_labels = show;
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_config_defaults() {
        let config = DiagramConfig::default();
        assert_eq!(config.size(), Size::new(200.0, 200.0));
        assert_eq!(config.node_padding(), 6.0);
        assert_eq!(config.circle_radius(), 300.0);
        assert!(config.show_layout_steps());
        assert!(!config.init_layout_on_redraw());
        assert_eq!(config.prune_after(), None);
        assert_eq!(config.schedule().total(), 50);
    }

    #[test]
    fn test_schedule_phases() {
        let schedule = IterationSchedule::default();
        assert_eq!(
            (schedule.warmup(), schedule.cool(), schedule.settle()),
            (10, 20, 20)
        );
    }

    #[test]
    fn test_style_invalid_background() {
        let style = StyleConfig::default().with_background_color("nope nope");
        assert!(style.background_color().is_err());
    }
}
