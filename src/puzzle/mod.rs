//! Puzzle state contracts and a reference grid implementation
//!
//! The solving core only ever sees a puzzle through [`PuzzleView`] (read) and
//! [`MutationSink`] (write). Topology lives entirely in the list of houses, so
//! the same core drives Sudoku, Latin squares and jigsaw grids alike.

pub use self::candidate_set::CandidateSet;
pub use self::grid::{Family, Grid};
pub use self::house::{House, HouseKind};

pub mod render;

mod candidate_set;
mod grid;
mod house;
mod parse;

use std::fmt;

/// A puzzle value, `1..=domain_size`
pub type Value = u8;

/// The largest supported domain (and grid width)
pub const MAX_DOMAIN: usize = 16;

/// A `(row, column)` coordinate into a grid
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Iterates every cell of a square grid in row-major order
    pub fn all(width: usize) -> impl Iterator<Item = Cell> {
        (0..width * width).map(move |i| Cell::new(i / width, i % width))
    }

    pub fn transposed(self) -> Self {
        Self::new(self.col, self.row)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row + 1, self.col + 1)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A single candidate assignment: `value` in `cell`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCandidate {
    pub cell: Cell,
    pub value: Value,
}

impl CellCandidate {
    pub const fn new(cell: Cell, value: Value) -> Self {
        Self { cell, value }
    }

    pub fn transposed(self) -> Self {
        Self::new(self.cell.transposed(), self.value)
    }
}

impl fmt::Display for CellCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.cell)
    }
}

impl fmt::Debug for CellCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Read access to puzzle state
pub trait PuzzleView {
    /// Width and height of the grid
    fn width(&self) -> usize;

    /// Number of distinct values; values are `1..=domain_size`
    fn domain_size(&self) -> usize;

    /// Remaining candidates of a cell. Empty for solved cells.
    fn candidates_at(&self, cell: Cell) -> CandidateSet;

    /// The placed value of a cell, if any
    fn value_at(&self, cell: Cell) -> Option<Value>;

    fn houses(&self) -> &[House];

    /// Indices into `houses()` of every house containing `cell`
    fn houses_of(&self, cell: Cell) -> Vec<usize> {
        self.houses()
            .iter()
            .enumerate()
            .filter(|(_, house)| house.contains(cell))
            .map(|(i, _)| i)
            .collect()
    }

    /// True if two distinct cells share a house
    fn sees(&self, a: Cell, b: Cell) -> bool {
        a != b && self.houses().iter().any(|h| h.contains(a) && h.contains(b))
    }

    /// True if the cell is unsolved and still has the candidate
    fn has_candidate(&self, candidate: CellCandidate) -> bool {
        self.value_at(candidate.cell).is_none()
            && self.candidates_at(candidate.cell).contains(candidate.value)
    }

    fn is_complete(&self) -> bool {
        Cell::all(self.width()).all(|cell| self.value_at(cell).is_some())
    }
}

/// Write access to puzzle state. Only the push pipeline calls these.
pub trait MutationSink {
    fn set_value(&mut self, cell: Cell, value: Value);

    fn remove_candidate(&mut self, cell: Cell, value: Value);
}

/// A puzzle the solver can own: readable, writable and cheap to snapshot
pub trait Puzzle: PuzzleView + MutationSink + Clone {}

impl<T> Puzzle for T where T: PuzzleView + MutationSink + Clone {}
