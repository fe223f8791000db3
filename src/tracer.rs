//! Ray tracer over the doubled lattice.
//!
//! Rays advance one lattice unit per step. Whenever a step lands on a cell
//! boundary, the cell on the far side of that boundary decides what happens:
//! - reflective (`A`): the velocity is mirrored off the boundary
//! - opaque (`B`): the ray-thread ends before the step is taken
//! - refractive (`C`): a mirrored copy starts from the current position and
//!   the original carries on straight
//!
//! At a corner only the diagonally opposite cell is consulted, and a mirror
//! there reverses both velocity components.
//!
//! Termination is guaranteed by a seen-state set shared by all ray-threads of
//! one trace, plus a per-thread step cap.

use rustc_hash::FxHashSet;

use crate::blocks::Cell;
use crate::board::Board;
use crate::geometry::{Point, Ray};

/// Default maximum number of steps for a single ray-thread.
pub const DEFAULT_STEP_CAP: usize = 10_000;

/// Target points lit during a trace.
pub type HitSet = FxHashSet<Point>;

/// Why a ray-thread stopped, with its state at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Left the board; the ray holds its first off-board position.
    Exited(Ray),
    /// Stopped by an opaque cell; the ray holds the position before impact.
    Absorbed(Ray),
    /// Reached a state some ray-thread of this trace had already been in.
    Looped(Ray),
    /// Ran out of steps.
    StepCap(Ray),
}

/// Full outcome of tracing one board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub hits: HitSet,
    /// One entry per ray-thread, in processing order.
    pub terminations: Vec<Termination>,
}

/// Something that can tell which targets of a board are lit.
///
/// The placement search only needs this, so tests can swap in a stub.
pub trait LightModel {
    fn illuminated(&self, board: &Board) -> HitSet;
}

/// The lattice ray tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracer {
    step_cap: usize,
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_CAP)
    }
}

impl Tracer {
    pub const fn new(step_cap: usize) -> Self {
        Self { step_cap }
    }

    /// Traces every laser of `board` to completion.
    pub fn run(&self, board: &Board) -> Trace {
        let targets: FxHashSet<Point> = board.targets.iter().copied().collect();
        let (max_x, max_y) = board.lattice_extent();

        let mut trace = Trace::default();
        let mut seen: FxHashSet<Ray> = FxHashSet::default();
        // LIFO work list; order does not affect the hit set
        let mut pending: Vec<Ray> = board.lasers.clone();

        while let Some(mut ray) = pending.pop() {
            let mut steps = 0;

            let termination = loop {
                if !ray.within(max_x, max_y) {
                    break Termination::Exited(ray);
                }
                if steps > self.step_cap {
                    break Termination::StepCap(ray);
                }
                if !seen.insert(ray) {
                    break Termination::Looped(ray);
                }

                let next = ray.next_position();
                if let Some(boundary) = ray.boundary() {
                    match board.grid.cell_at(boundary.row, boundary.col) {
                        Some(Cell::Reflect) => ray = ray.reflected(boundary.crossing),
                        Some(Cell::Opaque) => break Termination::Absorbed(ray),
                        Some(Cell::Refract) => pending.push(ray.reflected(boundary.crossing)),
                        Some(Cell::Open | Cell::Blocked) | None => {}
                    }
                }

                ray.move_to(next);
                steps += 1;

                if targets.contains(&next) {
                    trace.hits.insert(next);
                }
            };

            log::trace!("ray-thread ended after {steps} steps: {termination:?}");
            trace.terminations.push(termination);
        }

        trace
    }
}

impl LightModel for Tracer {
    fn illuminated(&self, board: &Board) -> HitSet {
        self.run(board).hits
    }
}

/// Returns the targets of `board` lit by its lasers.
pub fn trace(board: &Board, step_cap: usize) -> HitSet {
    Tracer::new(step_cap).run(board).hits
}
