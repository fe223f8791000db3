//! Lattice geometry for ray propagation.
//!
//! Positions live on a doubled lattice: one grid unit is two lattice units,
//! so cell boundaries fall on even coordinates and cell interiors on odd ones.
//! A ray always moves diagonally by one lattice unit per step, which lets the
//! tracer work in integers with no floating point.
//!
//! `x` runs along columns (rightwards), `y` along rows (downwards).

/// A lattice coordinate `(x, y)`.
pub type Point = (i32, i32);

/// A grid cell coordinate `(row, col)`.
pub type Slot = (usize, usize);

/// Which kind of cell boundary a single step crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crossing {
    /// A vertical edge (new `x` even, new `y` odd).
    Vertical,
    /// A horizontal edge (new `y` even, new `x` odd).
    Horizontal,
    /// A cell corner (both new coordinates even).
    Corner,
}

impl Crossing {
    /// Mirrors a velocity off this boundary.
    ///
    /// Vertical edges flip `vx`, horizontal edges flip `vy`, and corners flip
    /// both (full reversal).
    #[inline]
    pub fn reflect(self, (vx, vy): (i32, i32)) -> (i32, i32) {
        match self {
            Crossing::Vertical => (-vx, vy),
            Crossing::Horizontal => (vx, -vy),
            Crossing::Corner => (-vx, -vy),
        }
    }
}

/// The cell a step runs into, identified by signed `(row, col)`.
///
/// Indices may be negative or past the edge of the grid; the grid lookup
/// treats those as "no cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub crossing: Crossing,
    pub row: i32,
    pub col: i32,
}

/// Index of the cell on the far side of an edge at lattice coordinate `edge`
/// when travelling with the given velocity component.
#[inline]
fn beyond(edge: i32, velocity: i32) -> i32 {
    if velocity > 0 {
        edge.div_euclid(2)
    } else {
        edge.div_euclid(2) - 1
    }
}

/// A directed light element on the lattice.
///
/// Velocity components are always exactly `+1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ray {
    x: i32,
    y: i32,
    vx: i32,
    vy: i32,
}

impl Ray {
    /// Creates a ray, normalizing each velocity component to its sign.
    ///
    /// Returns `None` if either component is zero: axis-aligned travel is not
    /// part of the lattice model.
    pub fn new(x: i32, y: i32, vx: i32, vy: i32) -> Option<Self> {
        if vx == 0 || vy == 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            vx: vx.signum(),
            vy: vy.signum(),
        })
    }

    #[inline]
    pub fn position(&self) -> Point {
        (self.x, self.y)
    }

    #[inline]
    pub fn velocity(&self) -> (i32, i32) {
        (self.vx, self.vy)
    }

    /// The lattice point this ray reaches after one step.
    #[inline]
    pub fn next_position(&self) -> Point {
        (self.x + self.vx, self.y + self.vy)
    }

    /// Identifies the boundary crossed by the next step and the cell beyond it.
    ///
    /// Returns `None` when the step stays inside a cell (both new coordinates
    /// odd). At a corner only the diagonally opposite cell is reported; the
    /// two cells sharing an edge with the corner are not consulted.
    pub fn boundary(&self) -> Option<Boundary> {
        let (nx, ny) = self.next_position();
        let vertical = nx.rem_euclid(2) == 0;
        let horizontal = ny.rem_euclid(2) == 0;

        match (vertical, horizontal) {
            (true, true) => Some(Boundary {
                crossing: Crossing::Corner,
                row: beyond(ny, self.vy),
                col: beyond(nx, self.vx),
            }),
            (true, false) => Some(Boundary {
                crossing: Crossing::Vertical,
                row: self.y.min(ny).div_euclid(2),
                col: beyond(nx, self.vx),
            }),
            (false, true) => Some(Boundary {
                crossing: Crossing::Horizontal,
                row: beyond(ny, self.vy),
                col: self.x.min(nx).div_euclid(2),
            }),
            (false, false) => None,
        }
    }

    /// The same position with the velocity mirrored off `crossing`.
    #[inline]
    pub fn reflected(&self, crossing: Crossing) -> Self {
        let (vx, vy) = crossing.reflect(self.velocity());
        Self { vx, vy, ..*self }
    }

    /// Moves to `(x, y)`, keeping the current velocity.
    #[inline]
    pub(crate) fn move_to(&mut self, (x, y): Point) {
        self.x = x;
        self.y = y;
    }

    /// Whether the position lies in `[0, max_x] x [0, max_y]`.
    #[inline]
    pub fn within(&self, max_x: i32, max_y: i32) -> bool {
        (0..=max_x).contains(&self.x) && (0..=max_y).contains(&self.y)
    }
}
