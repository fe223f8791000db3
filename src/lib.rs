//! Lazor Puzzle Solver Library
//!
//! Places a limited inventory of optical blocks (reflective `A`, opaque `B`,
//! refractive `C`) into the open cells of a grid so that the board's lasers
//! light every target point.
//!
//! The [`tracer`] simulates light on a doubled lattice; the [`solver`]
//! enumerates block layouts and uses the tracer to score them.

pub mod bff;
pub mod blocks;
pub mod board;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod solver;
pub mod tracer;

pub use blocks::{BlockKind, Cell, Inventory};
pub use board::{Board, Puzzle};
pub use geometry::{Point, Ray, Slot};
pub use grid::Grid;
pub use solver::{search, search_with, Diagnosis, SearchOptions, SearchReport};
pub use tracer::{trace, LightModel, Trace, Tracer};
