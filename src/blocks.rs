//! Cell states and block inventory.
//!
//! A board cell is always one of five states. Three of them are optical
//! blocks that interact with light; the two empty states are transparent and
//! differ only in whether the search may place a block there.

use std::fmt;

/// One cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Empty and fillable (`o`).
    Open,
    /// Empty and never fillable (`x`).
    Blocked,
    /// Reflective block (`A`).
    Reflect,
    /// Opaque block (`B`).
    Opaque,
    /// Refractive block (`C`).
    Refract,
}

impl Cell {
    /// Parses a grid symbol. Returns `None` for anything outside `o x A B C`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'o' => Some(Cell::Open),
            'x' => Some(Cell::Blocked),
            'A' => Some(Cell::Reflect),
            'B' => Some(Cell::Opaque),
            'C' => Some(Cell::Refract),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Open => 'o',
            Cell::Blocked => 'x',
            Cell::Reflect => 'A',
            Cell::Opaque => 'B',
            Cell::Refract => 'C',
        }
    }

    /// The block occupying this cell, if any.
    #[inline]
    pub fn block(self) -> Option<BlockKind> {
        match self {
            Cell::Reflect => Some(BlockKind::Reflect),
            Cell::Opaque => Some(BlockKind::Opaque),
            Cell::Refract => Some(BlockKind::Refract),
            Cell::Open | Cell::Blocked => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A placeable block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Reflect,
    Opaque,
    Refract,
}

impl BlockKind {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Cell::from_symbol(symbol).and_then(Cell::block)
    }
}

impl From<BlockKind> for Cell {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Reflect => Cell::Reflect,
            BlockKind::Opaque => Cell::Opaque,
            BlockKind::Refract => Cell::Refract,
        }
    }
}

/// Number of blocks of each kind the search must place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    pub reflect: usize,
    pub opaque: usize,
    pub refract: usize,
}

impl Inventory {
    pub const fn new(reflect: usize, opaque: usize, refract: usize) -> Self {
        Self {
            reflect,
            opaque,
            refract,
        }
    }

    pub fn get(&self, kind: BlockKind) -> usize {
        match kind {
            BlockKind::Reflect => self.reflect,
            BlockKind::Opaque => self.opaque,
            BlockKind::Refract => self.refract,
        }
    }

    pub fn set(&mut self, kind: BlockKind, count: usize) {
        match kind {
            BlockKind::Reflect => self.reflect = count,
            BlockKind::Opaque => self.opaque = count,
            BlockKind::Refract => self.refract = count,
        }
    }

    /// Total number of blocks to place.
    pub fn total(&self) -> usize {
        self.reflect + self.opaque + self.refract
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={}, B={}, C={}",
            self.reflect, self.opaque, self.refract
        )
    }
}
