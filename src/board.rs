//! Board and puzzle definitions.
//!
//! A [`Board`] is everything the tracer needs: the cells, the light sources
//! and the target points. A [`Puzzle`] adds the inventory and the list of
//! open slots, and is the read-only template for one solver run.

use crate::blocks::Inventory;
use crate::geometry::{Point, Ray, Slot};
use crate::grid::Grid;
use crate::solver::{search_with, SearchOptions, SearchReport};
use crate::tracer::{Trace, Tracer};

/// Cells, light sources and targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub grid: Grid,
    pub lasers: Vec<Ray>,
    pub targets: Vec<Point>,
}

impl Board {
    pub fn new(grid: Grid, lasers: Vec<Ray>, targets: Vec<Point>) -> Self {
        Self {
            grid,
            lasers,
            targets,
        }
    }

    /// A board with the same sources and targets over a different grid.
    pub fn with_grid(&self, grid: Grid) -> Self {
        Self {
            grid,
            lasers: self.lasers.clone(),
            targets: self.targets.clone(),
        }
    }

    /// Largest lattice coordinates still on the board, `(2 * width, 2 * height)`.
    #[inline]
    pub fn lattice_extent(&self) -> (i32, i32) {
        (
            2 * self.grid.width() as i32,
            2 * self.grid.height() as i32,
        )
    }
}

/// A complete puzzle: board template, inventory and open slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub board: Board,
    pub inventory: Inventory,
    /// Fillable cells of `board.grid`, row-major.
    pub open_slots: Vec<Slot>,
}

impl Puzzle {
    /// Creates a puzzle, extracting the open slots from the board's grid.
    pub fn new(board: Board, inventory: Inventory) -> Self {
        let open_slots = board.grid.open_slots();
        Self {
            board,
            inventory,
            open_slots,
        }
    }

    /// Searches for a block layout that lights every target.
    pub fn solve(&self, options: &SearchOptions) -> SearchReport {
        let tracer = Tracer::new(options.step_cap);
        search_with(
            &tracer,
            &self.board,
            &self.inventory,
            &self.open_slots,
            options,
        )
    }

    /// Traces the board as given, with no blocks placed.
    pub fn trace(&self, step_cap: usize) -> Trace {
        Tracer::new(step_cap).run(&self.board)
    }
}

/// Builds a board from symbol rows, `(x, y, vx, vy)` lasers and targets.
#[cfg(test)]
pub(crate) fn board_from(
    rows: &[&str],
    lasers: &[(i32, i32, i32, i32)],
    targets: &[Point],
) -> Board {
    use crate::blocks::Cell;

    let rows = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|symbol| Cell::from_symbol(symbol).expect("valid cell symbol"))
                .collect()
        })
        .collect();
    let lasers = lasers
        .iter()
        .map(|&(x, y, vx, vy)| Ray::new(x, y, vx, vy).expect("diagonal velocity"))
        .collect();
    Board::new(
        Grid::from_rows(rows).expect("rectangular grid"),
        lasers,
        targets.to_vec(),
    )
}
