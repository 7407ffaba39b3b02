//! Layout run lifecycle.

use log::{debug, info, trace, warn};

use crate::layout::{IterationSchedule, LayoutSolver, SolverEvent, SolverInput};

/// When the diagram redraws geometry during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStrategy {
    /// Draw after every solver tick, and once more at the end.
    EveryTick,
    /// Draw only once, at the end.
    EndOnly,
}

impl DrawStrategy {
    pub fn from_show_steps(show_layout_steps: bool) -> Self {
        if show_layout_steps {
            Self::EveryTick
        } else {
            Self::EndOnly
        }
    }
}

/// What the host should do after one coordinated step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorStep {
    /// Nothing is running.
    Idle,
    /// Positions moved. `draw` is set when the strategy draws per tick.
    Tick { draw: bool },
    /// The run completed. Reported exactly once per run.
    Finished,
}

/// Starts, halts and steps layout runs, and guarantees each run finishes
/// at most once.
#[derive(Debug)]
pub struct LayoutCoordinator {
    strategy: DrawStrategy,
    running: bool,
    ticks: u64,
    runs: u64,
}

impl LayoutCoordinator {
    pub fn new(strategy: DrawStrategy) -> Self {
        Self {
            strategy,
            running: false,
            ticks: 0,
            runs: 0,
        }
    }

    pub fn strategy(&self) -> DrawStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: DrawStrategy) {
        self.strategy = strategy;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks reported by the current (or last) run.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of runs started so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Stops the in-flight run, if any. The halted run never finishes.
    pub fn halt<S: LayoutSolver + ?Sized>(&mut self, solver: &mut S) {
        if self.running || solver.is_running() {
            debug!(ticks = self.ticks; "Halting in-flight layout run");
            solver.stop();
        }
        self.running = false;
    }

    /// Starts a new run, halting the previous one first.
    pub fn run<S: LayoutSolver + ?Sized>(
        &mut self,
        solver: &mut S,
        input: SolverInput,
        schedule: IterationSchedule,
    ) {
        self.halt(solver);

        info!(
            nodes = input.nodes.len(),
            links = input.links.len(),
            constraints = input.constraints.len(),
            iterations = schedule.total();
            "Starting layout run"
        );

        solver.start(input, schedule);
        self.running = true;
        self.ticks = 0;
        self.runs += 1;
    }

    /// Advances the current run by one solver iteration.
    pub fn step<S: LayoutSolver + ?Sized>(&mut self, solver: &mut S) -> CoordinatorStep {
        if !self.running {
            return CoordinatorStep::Idle;
        }

        match solver.step() {
            SolverEvent::Tick => {
                self.ticks += 1;
                trace!(tick = self.ticks; "Layout tick");
                CoordinatorStep::Tick {
                    draw: self.strategy == DrawStrategy::EveryTick,
                }
            }
            SolverEvent::End => {
                self.running = false;
                info!(ticks = self.ticks; "Layout run finished");
                CoordinatorStep::Finished
            }
            SolverEvent::Idle => {
                warn!("Layout solver went idle without finishing the run");
                self.running = false;
                CoordinatorStep::Idle
            }
        }
    }
}
