//! Force-directed reference solver
//!
//! This module implements a steppable force-directed layout. Nodes repel
//! each other, links act as springs toward their preferred length and a weak
//! pull keeps the drawing near the canvas center. A run goes through three
//! phases whose lengths come from the [`IterationSchedule`]:
//!
//! 1. warm-up: forces only,
//! 2. cooling: forces, then constraint projection,
//! 3. settling: as cooling, plus overlap removal when enabled.

use log::{debug, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use weft_core::geometry::{Point, Size};

use crate::{
    constraint::{Axis, Constraint},
    layout::{IterationSchedule, LayoutSolver, SolverEvent, SolverInput, SolverLink, SolverNode},
};

/// Random offset applied to freshly placed nodes so none start coincident.
const PLACEMENT_JITTER: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Warmup,
    Cooling,
    Settling,
}

/// Force layout solver
///
/// Positions already present on the input nodes are kept as the starting
/// point, so re-running over the same wrappers continues from where the
/// previous run left them.
#[derive(Debug)]
pub struct ForceSolver {
    // Simulation parameters
    spring_constant: f32,
    repulsion_constant: f32,
    damping_factor: f32,
    gravity: f32,
    link_length: f32,
    min_distance: f32,
    max_displacement: f32,
    seed: Option<u64>,
    // Options set through `configure`
    avoid_overlaps: bool,
    size: Size,
    // Run state
    nodes: Vec<SolverNode>,
    links: Vec<SolverLink>,
    constraints: Vec<Constraint>,
    schedule: IterationSchedule,
    iteration: u32,
    running: bool,
    rng: StdRng,
}

impl Default for ForceSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceSolver {
    /// Create a new force solver with an OS-seeded generator
    pub fn new() -> Self {
        Self {
            spring_constant: 0.1,
            repulsion_constant: 1000.0,
            damping_factor: 0.85,
            gravity: 0.01,
            link_length: 120.0,
            min_distance: 80.0,
            max_displacement: 50.0,
            seed: None,
            avoid_overlaps: true,
            size: Size::default(),
            nodes: Vec::new(),
            links: Vec::new(),
            constraints: Vec::new(),
            schedule: IterationSchedule::default(),
            iteration: 0,
            running: false,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a solver whose initial placement is reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    /// Set the spring constant for link forces
    pub fn set_spring_constant(&mut self, constant: f32) -> &mut Self {
        self.spring_constant = constant;
        self
    }

    /// Set the repulsion constant for node forces
    pub fn set_repulsion_constant(&mut self, constant: f32) -> &mut Self {
        self.repulsion_constant = constant;
        self
    }

    /// Set the damping factor for the simulation
    pub fn set_damping_factor(&mut self, factor: f32) -> &mut Self {
        self.damping_factor = factor;
        self
    }

    /// Set the length used for links without a preferred length
    pub fn set_link_length(&mut self, length: f32) -> &mut Self {
        self.link_length = length;
        self
    }

    /// Set the minimum distance between nodes
    pub fn set_min_distance(&mut self, distance: f32) -> &mut Self {
        self.min_distance = distance;
        self
    }

    pub fn avoid_overlaps(&self) -> bool {
        self.avoid_overlaps
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    fn phase(&self) -> Phase {
        if self.iteration < self.schedule.warmup() {
            Phase::Warmup
        } else if self.iteration < self.schedule.warmup() + self.schedule.cool() {
            Phase::Cooling
        } else {
            Phase::Settling
        }
    }

    fn position(&self, index: usize) -> Point {
        self.nodes[index].position.unwrap_or_default()
    }

    /// Place nodes without a position on a ring around the canvas center
    fn initialize_positions(&mut self) {
        let unplaced: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].position.is_none())
            .collect();
        if unplaced.is_empty() {
            return;
        }

        let count = unplaced.len() as f32;
        let ring_radius = (self.min_distance * count / std::f32::consts::TAU).max(self.min_distance);
        let center = self.size.center();

        for (slot, index) in unplaced.into_iter().enumerate() {
            let angle = std::f32::consts::TAU * slot as f32 / count;
            let base = Point::new(angle.cos(), angle.sin()).scale(ring_radius);
            let jitter = Point::new(
                self.rng.random_range(-PLACEMENT_JITTER..PLACEMENT_JITTER),
                self.rng.random_range(-PLACEMENT_JITTER..PLACEMENT_JITTER),
            );
            self.nodes[index].position = Some(center.add_point(base).add_point(jitter));
        }
    }

    /// One iteration of repulsion, spring and gravity forces
    fn apply_forces(&mut self) {
        let count = self.nodes.len();
        let mut forces = vec![Point::default(); count];

        // Add repulsive forces between all nodes
        for i in 0..count {
            for j in 0..count {
                if i == j {
                    continue;
                }

                let trans = self.position(i).sub_point(self.position(j));
                let size_i = self.nodes[i].size;
                let size_j = self.nodes[j].size;

                // Minimum distance based on node sizes plus spacing
                let min_dist = (size_i.width() + size_j.width() + size_i.height() + size_j.height())
                    / 4.0
                    + self.min_distance;

                // Avoid division by zero
                let distance = trans.hypot().max(1.0);

                // Stronger repulsion when nodes are too close
                let force_factor = if distance < min_dist {
                    self.repulsion_constant * (min_dist / distance).powf(2.0) / min_dist
                } else {
                    self.repulsion_constant / distance
                };

                forces[i] = forces[i].add_point(trans.scale(force_factor / distance));
            }
        }

        // Add spring forces toward each link's preferred length
        for link in &self.links {
            let dist = self.position(link.source).sub_point(self.position(link.target));
            let distance = dist.hypot().max(1.0);
            let ideal = link.length.unwrap_or(self.link_length);

            let force = self.spring_constant * (distance - ideal);
            let pull = dist.scale(force / distance);

            forces[link.source] = forces[link.source].sub_point(pull);
            forces[link.target] = forces[link.target].add_point(pull);
        }

        // Pull everything gently toward the canvas center
        let center = self.size.center();
        for (i, force) in forces.iter_mut().enumerate() {
            let to_center = center.sub_point(self.position(i));
            *force = force.add_point(to_center.scale(self.gravity));
        }

        // Update velocities and positions
        for (node, force) in self.nodes.iter_mut().zip(forces) {
            let mut velocity = node.velocity.add_point(force).scale(self.damping_factor);
            let speed = velocity.hypot();
            if speed > self.max_displacement {
                velocity = velocity.scale(self.max_displacement / speed);
            }
            if !velocity.is_finite() {
                velocity = Point::default();
            }
            node.velocity = velocity;
            let position = node.position.unwrap_or_default();
            node.position = Some(position.add_point(velocity));
        }
    }

    /// Move nodes so separation and alignment constraints hold
    fn project_constraints(&mut self) {
        for constraint in &self.constraints {
            match constraint {
                Constraint::Separation {
                    axis,
                    left,
                    right,
                    gap,
                    equality,
                } => {
                    let (left, right) = (*left, *right);
                    if left >= self.nodes.len() || right >= self.nodes.len() {
                        continue;
                    }
                    let actual = coordinate(self.nodes[right].position, *axis)
                        - coordinate(self.nodes[left].position, *axis);
                    let violation = gap - actual;
                    if violation > 0.0 || (*equality && violation != 0.0) {
                        let half = violation / 2.0;
                        shift(&mut self.nodes[left], *axis, -half);
                        shift(&mut self.nodes[right], *axis, half);
                    }
                }
                Constraint::Alignment { axis, offsets } => {
                    let members: Vec<(usize, f32)> = offsets
                        .iter()
                        .copied()
                        .filter(|(index, _)| *index < self.nodes.len())
                        .collect();
                    if members.is_empty() {
                        continue;
                    }
                    let line = members
                        .iter()
                        .map(|(index, offset)| {
                            coordinate(self.nodes[*index].position, *axis) - offset
                        })
                        .sum::<f32>()
                        / members.len() as f32;
                    for (index, offset) in members {
                        let delta = line + offset - coordinate(self.nodes[index].position, *axis);
                        shift(&mut self.nodes[index], *axis, delta);
                    }
                }
                Constraint::Circle { .. } | Constraint::Other { .. } => {}
            }
        }
    }

    /// Push apart every pair of nodes whose bounding circles intersect
    fn remove_overlaps(&mut self) {
        let count = self.nodes.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let reach = (self.nodes[i].size.width().max(self.nodes[i].size.height())
                    + self.nodes[j].size.width().max(self.nodes[j].size.height()))
                    / 2.0;
                let trans = self.position(j).sub_point(self.position(i));
                let distance = trans.hypot();
                if distance >= reach {
                    continue;
                }

                // Coincident nodes have no direction; separate them horizontally
                let direction = if distance == 0.0 {
                    Point::new(1.0, 0.0)
                } else {
                    trans.normalize()
                };
                let push = direction.scale((reach - distance) / 2.0);
                let pos_i = self.position(i);
                let pos_j = self.position(j);
                self.nodes[i].position = Some(pos_i.sub_point(push));
                self.nodes[j].position = Some(pos_j.add_point(push));
            }
        }
    }
}

fn coordinate(position: Option<Point>, axis: Axis) -> f32 {
    let position = position.unwrap_or_default();
    match axis {
        Axis::X => position.x(),
        Axis::Y => position.y(),
    }
}

fn shift(node: &mut SolverNode, axis: Axis, delta: f32) {
    let position = node.position.unwrap_or_default();
    let offset = match axis {
        Axis::X => Point::new(delta, 0.0),
        Axis::Y => Point::new(0.0, delta),
    };
    node.position = Some(position.add_point(offset));
}

impl LayoutSolver for ForceSolver {
    fn configure(&mut self, avoid_overlaps: bool, size: Size) {
        self.avoid_overlaps = avoid_overlaps;
        self.size = size;
    }

    fn start(&mut self, input: SolverInput, schedule: IterationSchedule) {
        let node_count = input.nodes.len();
        let links: Vec<SolverLink> = input
            .links
            .into_iter()
            .filter(|link| {
                let valid = link.source < node_count && link.target < node_count;
                if !valid {
                    warn!(
                        source = link.source,
                        target = link.target,
                        node_count;
                        "Dropping link with an out-of-range endpoint"
                    );
                }
                valid
            })
            .collect();

        if let Some(seed) = self.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        self.nodes = input.nodes;
        self.links = links;
        self.constraints = input.constraints;
        self.schedule = schedule;
        self.iteration = 0;
        self.running = true;

        self.initialize_positions();

        debug!(
            nodes = self.nodes.len(),
            links = self.links.len(),
            warmup = schedule.warmup(),
            cool = schedule.cool(),
            settle = schedule.settle();
            "Force solver started"
        );
    }

    fn step(&mut self) -> SolverEvent {
        if !self.running {
            return SolverEvent::Idle;
        }
        if self.iteration >= self.schedule.total() {
            self.running = false;
            return SolverEvent::End;
        }

        let phase = self.phase();
        self.apply_forces();
        if phase != Phase::Warmup {
            self.project_constraints();
        }
        if phase == Phase::Settling && self.avoid_overlaps {
            self.remove_overlaps();
        }

        self.iteration += 1;
        SolverEvent::Tick
    }

    fn nodes(&self) -> &[SolverNode] {
        &self.nodes
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
