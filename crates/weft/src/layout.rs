//! Layout solver contract.
//!
//! The core never computes positions itself. It hands a [`SolverInput`] to a
//! [`LayoutSolver`], and the host pumps the solver one iteration at a time
//! through [`crate::Diagram::step`]. Each iteration reports a
//! [`SolverEvent`]; the [`coordinator::LayoutCoordinator`] turns those into
//! draws and the completion notification.

pub mod coordinator;
pub mod force;

pub use coordinator::{CoordinatorStep, DrawStrategy, LayoutCoordinator};
pub use force::ForceSolver;

use weft_core::{
    geometry::{Point, Size},
    identifier::Key,
};

pub use crate::config::IterationSchedule;
use crate::constraint::Constraint;

/// A node as the solver sees it. Positions are mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverNode {
    pub key: Key,
    /// `None` until placed; solvers choose an initial position for these.
    pub position: Option<Point>,
    pub velocity: Point,
    pub size: Size,
}

impl SolverNode {
    pub fn new(key: Key, size: Size) -> Self {
        Self {
            key,
            position: None,
            velocity: Point::default(),
            size,
        }
    }

    pub fn with_position(mut self, position: Option<Point>) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Point) -> Self {
        self.velocity = velocity;
        self
    }
}

/// An edge between two node indices of the same [`SolverInput`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverLink {
    pub source: usize,
    pub target: usize,
    /// Preferred length; `None` leaves the choice to the solver.
    pub length: Option<f32>,
}

/// Everything one layout run operates on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverInput {
    pub nodes: Vec<SolverNode>,
    pub links: Vec<SolverLink>,
    pub constraints: Vec<Constraint>,
}

/// Outcome of one solver iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverEvent {
    /// Positions moved; the run continues.
    Tick,
    /// The schedule is exhausted. Reported once per run.
    End,
    /// No run is in progress.
    Idle,
}

/// A steppable, physics-based layout solver.
pub trait LayoutSolver {
    /// Sets options that apply to the next run.
    fn configure(&mut self, avoid_overlaps: bool, size: Size);

    /// Starts a run over `input`, discarding any previous one.
    fn start(&mut self, input: SolverInput, schedule: IterationSchedule);

    /// Advances the current run by one iteration.
    fn step(&mut self) -> SolverEvent;

    /// Node state of the current (or last) run, in input order.
    fn nodes(&self) -> &[SolverNode];

    /// Halts the current run. No further events are reported for it.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

impl<S: LayoutSolver + ?Sized> LayoutSolver for Box<S> {
    fn configure(&mut self, avoid_overlaps: bool, size: Size) {
        (**self).configure(avoid_overlaps, size);
    }

    fn start(&mut self, input: SolverInput, schedule: IterationSchedule) {
        (**self).start(input, schedule);
    }

    fn step(&mut self) -> SolverEvent {
        (**self).step()
    }

    fn nodes(&self) -> &[SolverNode] {
        (**self).nodes()
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}
