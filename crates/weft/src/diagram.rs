//! The diagram facade.
//!
//! [`Diagram`] ties the pieces together: it binds the groupings into a
//! frame, synchronizes the surface, expands constraints, starts the solver
//! and, as the host steps the solver, merges positions back into the cache
//! and draws.

use indexmap::IndexMap;
use log::{debug, info, trace};

use weft_core::{
    draw::MarkerDefinition,
    geometry::{Point, Transform},
    identifier::Key,
};

use crate::{
    accessor::Accessors,
    cache::{EdgeKey, EdgeWrapper, Endpoint, KeyedCache, NodeWrapper},
    config::DiagramConfig,
    constraint::{self, Constraint},
    error::WeftError,
    events::{EventRegistry, LayoutEnd},
    layout::{
        CoordinatorStep, DrawStrategy, LayoutCoordinator, LayoutSolver, SolverInput, SolverLink,
        SolverNode,
    },
    path::{self, NodeShape},
    record::DataSource,
    surface::{
        EdgeAttrs, ElementAttrs, ElementId, HoverAttrs, LabelAttrs, NodeAttrs, Placement,
        RenderSurface,
    },
    sync::{RenderSync, SyncReport},
    topology::{self, Frame},
};

/// Produces constraint requests from the current frame's wrappers, in frame
/// order. Node indices in the returned constraints refer to that order.
pub type ConstrainFn<N, E> = Box<dyn Fn(&[&NodeWrapper<N>], &[&EdgeWrapper<E>]) -> Vec<Constraint>>;

/// Adjusts the solver whenever the layout is (re)initialized.
pub type ModLayoutFn<S> = Box<dyn FnMut(&mut S)>;

/// An incrementally rendered, force-directed diagram.
///
/// # Examples
///
/// ```
/// use weft::{
///     Diagram,
///     accessor::{Accessors, EdgeAccessors},
///     config::DiagramConfig,
///     layout::ForceSolver,
///     record::{DataSource, EdgeValue, NodeValue, Record},
///     export::svg::SvgSurface,
/// };
/// use weft_core::identifier::Key;
///
/// #[derive(Clone)]
/// struct Host;
/// impl NodeValue for Host {}
///
/// #[derive(Clone)]
/// struct Link(String, String);
/// impl EdgeValue for Link {}
///
/// let nodes = vec![Record::new("a", Host), Record::new("b", Host)];
/// let edges = vec![Record::new("a-b", Link("a".into(), "b".into()))];
///
/// let mut diagram = Diagram::new(
///     DiagramConfig::default(),
///     DataSource::new(nodes, edges),
///     Accessors::with_edges(EdgeAccessors::new(
///         |r: &Record<Link>| Key::new(&r.value.0),
///         |r: &Record<Link>| Key::new(&r.value.1),
///     )),
///     ForceSolver::with_seed(1),
///     SvgSurface::default(),
/// );
///
/// diagram.render();
/// diagram.settle();
/// assert!(diagram.surface().to_string().contains("edge-a-b"));
/// ```
pub struct Diagram<N, E, S, R> {
    config: DiagramConfig,
    data: DataSource<N, E>,
    accessors: Accessors<N, E>,
    solver: S,
    surface: R,
    cache: KeyedCache<N, E>,
    frame: Frame,
    coordinator: LayoutCoordinator,
    sync: RenderSync,
    events: EventRegistry,
    markers: IndexMap<String, MarkerDefinition>,
    constrain: Option<ConstrainFn<N, E>>,
    mod_layout: Option<ModLayoutFn<S>>,
    transform: Transform,
    last_report: SyncReport,
    draws: u64,
}

impl<N, E, S, R> Diagram<N, E, S, R>
where
    S: LayoutSolver,
    R: RenderSurface,
{
    pub fn new(
        config: DiagramConfig,
        data: DataSource<N, E>,
        accessors: Accessors<N, E>,
        solver: S,
        surface: R,
    ) -> Self {
        let markers = MarkerDefinition::builtin()
            .into_iter()
            .map(|marker| (marker.name().to_string(), marker))
            .collect();

        Self {
            coordinator: LayoutCoordinator::new(DrawStrategy::from_show_steps(
                config.show_layout_steps(),
            )),
            config,
            data,
            accessors,
            solver,
            surface,
            cache: KeyedCache::new(),
            frame: Frame::default(),
            sync: RenderSync::new(),
            events: EventRegistry::new(),
            markers,
            constrain: None,
            mod_layout: None,
            transform: Transform::identity(),
            last_report: SyncReport::default(),
            draws: 0,
        }
    }

    /// Sets the hook producing constraint requests on every redraw.
    pub fn with_constrain(
        mut self,
        constrain: impl Fn(&[&NodeWrapper<N>], &[&EdgeWrapper<E>]) -> Vec<Constraint> + 'static,
    ) -> Self {
        self.constrain = Some(Box::new(constrain));
        self
    }

    /// Sets the hook run against the solver whenever the layout is initialized.
    pub fn with_mod_layout(mut self, mod_layout: impl FnMut(&mut S) + 'static) -> Self {
        self.mod_layout = Some(Box::new(mod_layout));
        self
    }

    /// Resets the surface, reinitializes the layout and redraws.
    pub fn render(&mut self) -> SyncReport {
        info!(
            width = self.config.width(),
            height = self.config.height();
            "Rendering diagram"
        );

        self.coordinator.halt(&mut self.solver);
        self.surface
            .reset(self.config.size(), self.config.zoomable());
        self.sync.reset();
        for marker in self.markers.values() {
            self.surface.define_marker(marker);
        }
        if self.config.zoomable() {
            self.surface.zoom(self.transform);
        }

        // redraw initializes on its own in this mode
        if !self.config.init_layout_on_redraw() {
            self.initialize_layout();
        }
        self.redraw()
    }

    /// Reconciles the surface with the current data and starts a new
    /// layout run from the cached positions.
    pub fn redraw(&mut self) -> SyncReport {
        if self.config.init_layout_on_redraw() {
            self.initialize_layout();
        }
        self.coordinator.halt(&mut self.solver);

        let generation = self.cache.advance_generation();
        let (node_records, edge_records) = self.data.query();
        self.frame = topology::bind(
            &mut self.cache,
            node_records,
            edge_records,
            &self.accessors.node,
            &self.accessors.edge,
            self.config.node_padding(),
        );

        if let Some(max_idle) = self.config.prune_after() {
            let pruned = self.cache.prune(max_idle);
            if pruned > 0 {
                debug!(pruned, generation; "Pruned idle wrappers");
            }
        }

        self.last_report = self.sync_surface();

        let requests = self.constraint_requests();
        let expansion = constraint::expand(
            &mut self.cache,
            &self.frame,
            requests,
            self.config.circle_radius(),
        );
        let input = self.solver_input(expansion.layout_edges, expansion.constraints);
        self.coordinator
            .run(&mut self.solver, input, self.config.schedule());

        self.last_report
    }

    /// Advances the layout by one solver iteration.
    ///
    /// Positions are merged into the cache on every tick. Geometry is drawn
    /// per tick when layout steps are shown, and always once when the run
    /// finishes, followed by the `end` event.
    pub fn step(&mut self) -> CoordinatorStep {
        let step = self.coordinator.step(&mut self.solver);
        match step {
            CoordinatorStep::Tick { draw } => {
                self.merge_positions();
                if draw {
                    self.draw();
                }
            }
            CoordinatorStep::Finished => {
                self.merge_positions();
                self.finish();
            }
            CoordinatorStep::Idle => {}
        }
        step
    }

    /// Steps until the current run finishes. Returns the number of ticks.
    pub fn settle(&mut self) -> u64 {
        let mut ticks = 0;
        loop {
            match self.step() {
                CoordinatorStep::Tick { .. } => ticks += 1,
                CoordinatorStep::Finished | CoordinatorStep::Idle => return ticks,
            }
        }
    }

    /// Registers a handler for `end` or `end.<namespace>`.
    ///
    /// # Errors
    ///
    /// Returns [`WeftError::UnknownEvent`] for any other event type.
    pub fn on(
        &mut self,
        name: &str,
        handler: impl FnMut(&LayoutEnd) + 'static,
    ) -> Result<(), WeftError> {
        self.events.on(name, handler)
    }

    pub fn off(&mut self, name: &str) -> bool {
        self.events.off(name)
    }

    /// Applies a zoom/pan transform. Ignored when the diagram is not zoomable.
    pub fn zoom(&mut self, transform: Transform) {
        if !self.config.zoomable() {
            debug!("Ignoring zoom on a non-zoomable diagram");
            return;
        }
        self.transform = transform;
        self.surface.zoom(transform);
    }

    /// Adds or replaces a marker definition usable as arrowhead or arrowtail.
    pub fn define_arrow(&mut self, marker: MarkerDefinition) {
        self.surface.define_marker(&marker);
        self.markers.insert(marker.name().to_string(), marker);
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn cache(&self) -> &KeyedCache<N, E> {
        &self.cache
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Report of the most recent sync cycle.
    pub fn last_report(&self) -> SyncReport {
        self.last_report
    }

    /// Number of sync cycles run against the surface.
    pub fn sync_cycles(&self) -> u64 {
        self.sync.cycles()
    }

    /// Number of times geometry was drawn.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn is_running(&self) -> bool {
        self.coordinator.is_running()
    }

    /// Current position of a node, if it was placed.
    pub fn position_of(&self, key: Key) -> Option<Point> {
        self.cache.node(key).and_then(|node| node.position())
    }

    fn initialize_layout(&mut self) {
        self.coordinator.halt(&mut self.solver);
        self.solver
            .configure(self.config.avoid_overlaps(), self.config.size());
        if let Some(mod_layout) = self.mod_layout.as_mut() {
            mod_layout(&mut self.solver);
        }
        debug!(avoid_overlaps = self.config.avoid_overlaps(); "Layout initialized");
    }

    fn constraint_requests(&self) -> Vec<Constraint> {
        let Some(constrain) = &self.constrain else {
            return Vec::new();
        };
        let nodes: Vec<&NodeWrapper<N>> = self
            .frame
            .nodes()
            .iter()
            .filter_map(|&key| self.cache.node(key))
            .collect();
        let edges: Vec<&EdgeWrapper<E>> = self
            .frame
            .edges()
            .iter()
            .filter_map(|&key| self.cache.edge(key))
            .collect();
        constrain(&nodes, &edges)
    }

    fn solver_input(&self, layout_edges: Vec<EdgeKey>, constraints: Vec<Constraint>) -> SolverInput {
        let nodes = self
            .frame
            .nodes()
            .iter()
            .filter_map(|&key| self.cache.node(key))
            .map(|node| {
                SolverNode::new(node.key(), node.size())
                    .with_position(node.position())
                    .with_velocity(node.velocity())
            })
            .collect();

        let links = layout_edges
            .into_iter()
            .filter_map(|key| self.cache.edge(key))
            .filter_map(|edge| {
                Some(SolverLink {
                    source: edge.source().index()?,
                    target: edge.target().index()?,
                    length: edge.ideal_length(),
                })
            })
            .collect();

        SolverInput {
            nodes,
            links,
            constraints,
        }
    }

    /// Elements the surface should hold for the current frame.
    fn desired_elements(&self) -> Vec<(ElementId, ElementAttrs)> {
        let mut elements = Vec::new();
        let node_accessors = &self.accessors.node;
        let edge_accessors = &self.accessors.edge;

        for node in self.frame.nodes().iter().filter_map(|&key| self.cache.node(key)) {
            let record = node.orig();
            elements.push((
                ElementId::node(node.key()),
                ElementAttrs::Node(NodeAttrs {
                    radius: node.radius(),
                    fill: (node_accessors.fill)(record),
                    stroke: (node_accessors.stroke)(record),
                    stroke_width: node.stroke_width(),
                    label: (node_accessors.label)(record),
                }),
            ));
        }

        for edge in self.frame.edges().iter().filter_map(|&key| self.cache.edge(key)) {
            let (Some(key), Some(record)) = (edge.key().record(), edge.orig()) else {
                continue;
            };
            let edge_id = ElementId::edge(key);
            elements.push((
                edge_id.clone(),
                ElementAttrs::Edge(EdgeAttrs {
                    stroke: (edge_accessors.stroke)(record),
                    stroke_width: (edge_accessors.stroke_width)(record),
                    opacity: (edge_accessors.opacity)(record),
                    marker_end: (edge_accessors.arrowhead)(record),
                    marker_start: (edge_accessors.arrowtail)(record),
                }),
            ));
            elements.push((
                ElementId::edge_hover(key),
                ElementAttrs::EdgeHover(HoverAttrs::default()),
            ));
            elements.push((
                ElementId::edge_label(key),
                ElementAttrs::EdgeLabel(LabelAttrs {
                    text: edge_accessors.label_of(record),
                    path_id: edge_id.dom_id().to_string(),
                }),
            ));
        }

        elements
    }

    fn sync_surface(&mut self) -> SyncReport {
        let desired = self.desired_elements();
        self.sync.sync(&mut self.surface, desired)
    }

    /// Copies solver positions and velocities into the cached wrappers.
    fn merge_positions(&mut self) {
        for node in self.solver.nodes() {
            if let Some(wrapper) = self.cache.node_mut(node.key) {
                if let Some(position) = node.position {
                    wrapper.set_position(position);
                }
                wrapper.set_velocity(node.velocity);
            }
        }
    }

    fn node_shape(&self, endpoint: Endpoint) -> Option<NodeShape> {
        let key = match endpoint {
            Endpoint::Index(index) => self.frame.node_at(index)?,
            Endpoint::Node(key) => key,
            Endpoint::Unresolved => return None,
        };
        let node = self.cache.node(key)?;
        Some(NodeShape::new(
            node.position()?,
            node.radius(),
            node.stroke_width(),
        ))
    }

    /// Places every element of the current frame at its current geometry.
    fn draw(&mut self) {
        let mut placements: Vec<(ElementId, Placement)> = Vec::new();
        let mut lengths: Vec<(EdgeKey, f32)> = Vec::new();

        for &key in self.frame.nodes() {
            if let Some(position) = self.cache.node(key).and_then(|node| node.position()) {
                placements.push((ElementId::node(key), Placement::Translate(position)));
            }
        }

        for &edge_key in self.frame.edges() {
            let Some(key) = edge_key.record() else {
                continue;
            };
            let Some(edge) = self.cache.edge(edge_key) else {
                continue;
            };
            let (Some(source), Some(target)) =
                (self.node_shape(edge.source()), self.node_shape(edge.target()))
            else {
                trace!(edge:% = key; "Skipping edge without placed endpoints");
                continue;
            };

            let segment = path::edge_path(source, target);
            let orientation = path::label_orientation(source.center, target.center);
            lengths.push((edge_key, segment.length()));

            placements.push((ElementId::edge(key), Placement::Path(segment)));
            placements.push((ElementId::edge_hover(key), Placement::Path(segment)));
            placements.push((
                ElementId::edge_label(key),
                Placement::Label {
                    segment,
                    orientation,
                },
            ));
        }

        for (edge_key, length) in lengths {
            if let Some(edge) = self.cache.edge_mut(edge_key) {
                edge.set_length(length);
            }
        }
        for (id, placement) in &placements {
            self.surface.place(id, placement);
        }

        self.draws += 1;
        trace!(draw = self.draws, elements = placements.len(); "Drew diagram");
    }

    /// Completion sequence: one sync cycle, one draw, then the `end` event.
    fn finish(&mut self) {
        self.last_report = self.sync_surface();
        self.draw();

        let event = LayoutEnd {
            run: self.coordinator.runs(),
            ticks: self.coordinator.ticks(),
            nodes: self.frame.nodes().len(),
            edges: self.frame.edges().len(),
        };
        info!(run = event.run, ticks = event.ticks; "Layout complete");
        self.events.emit(&event);
    }
}
