//! Rectangular cell matrix.
//!
//! The grid is stored as a flat row-major vector (row 0 at the top). Lookups
//! take signed indices so the tracer can ask about cells just past the edge
//! of the board and get `None` back.

use std::fmt;

use thiserror::Error;

use crate::blocks::{BlockKind, Cell};
use crate::geometry::Slot;

/// Errors raised when building a grid from rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// No rows, or rows with no cells.
    #[error("grid has no cells")]
    Empty,
    /// A row whose length differs from the first row.
    #[error("grid is not rectangular: row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// A rectangular matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Builds a grid from rows, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::Empty);
        }

        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(GridError::Ragged {
                    row,
                    found: cells_in_row.len(),
                    expected: width,
                });
            }
            cells.extend(cells_in_row);
        }

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Looks up a cell by signed `(row, col)`; `None` outside the grid.
    #[inline]
    pub fn cell_at(&self, row: i32, col: i32) -> Option<Cell> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.get((row, col))
    }

    #[inline]
    pub fn get(&self, (row, col): Slot) -> Option<Cell> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Coordinates of every fillable cell, in row-major order.
    pub fn open_slots(&self) -> Vec<Slot> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Open)
            .map(|(index, _)| (index / self.width, index % self.width))
            .collect()
    }

    /// Returns a fresh grid with blocks placed at the given slots.
    ///
    /// The receiver is left untouched. Slots that are not open cells of this
    /// grid (off the grid, fixed, or already filled) are skipped.
    pub fn with_layout(&self, placements: impl IntoIterator<Item = (Slot, BlockKind)>) -> Self {
        let mut grid = self.clone();
        for (slot @ (row, col), kind) in placements {
            if grid.get(slot) != Some(Cell::Open) {
                log::warn!("skipping {kind:?} block on non-open slot ({row}, {col})");
                continue;
            }
            grid.cells[row * self.width + col] = kind.into();
        }
        grid
    }

    /// Number of cells in the given state.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

/// Renders one line per row, symbols only, no trailing newline.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}
