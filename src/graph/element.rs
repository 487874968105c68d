use std::fmt;
use std::slice;

use itertools::Itertools;

use crate::graph::Rank;
use crate::puzzle::{Cell, CellCandidate, PuzzleView, Value};

/// A proposition that can take part in a link: "value is placed in one of these cells"
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkElement {
    /// A single candidate
    Candidate(CellCandidate),
    /// The positions of a value in the intersection of a line and a box. Always
    /// at least two cells, sorted.
    PointingSet { value: Value, cells: Vec<Cell> },
    /// The positions of a value inside an almost locked set: `locked` holds the
    /// N cells of the set, which together have N + 1 candidates
    AlmostLockedSet {
        value: Value,
        cells: Vec<Cell>,
        locked: Vec<Cell>,
    },
}

impl LinkElement {
    pub fn candidate_at(cell: Cell, value: Value) -> Self {
        LinkElement::Candidate(CellCandidate::new(cell, value))
    }

    /// A group element, or a plain candidate when the group has one cell
    pub(crate) fn group(value: Value, mut cells: Vec<Cell>, locked: Option<&[Cell]>) -> Self {
        cells.sort();
        if cells.len() == 1 {
            return Self::candidate_at(cells[0], value);
        }
        match locked {
            None => LinkElement::PointingSet { value, cells },
            Some(locked) => LinkElement::AlmostLockedSet {
                value,
                cells,
                locked: locked.iter().copied().sorted().collect(),
            },
        }
    }

    pub fn value(&self) -> Value {
        match self {
            LinkElement::Candidate(c) => c.value,
            LinkElement::PointingSet { value, .. } => *value,
            LinkElement::AlmostLockedSet { value, .. } => *value,
        }
    }

    /// The cells that may hold `value()`
    pub fn cells(&self) -> &[Cell] {
        match self {
            LinkElement::Candidate(c) => slice::from_ref(&c.cell),
            LinkElement::PointingSet { cells, .. } => cells,
            LinkElement::AlmostLockedSet { cells, .. } => cells,
        }
    }

    pub fn candidate(&self) -> Option<CellCandidate> {
        match self {
            LinkElement::Candidate(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_candidate(&self) -> bool {
        self.candidate().is_some()
    }

    pub fn candidates(&self) -> impl Iterator<Item = CellCandidate> + '_ {
        let value = self.value();
        self.cells()
            .iter()
            .map(move |&cell| CellCandidate::new(cell, value))
    }

    /// True if no cell of either element could hold the same value in both
    pub fn is_disjoint(&self, other: &LinkElement) -> bool {
        self.value() != other.value() || self.cells().iter().all(|c| !other.cells().contains(c))
    }

    /// True if `cell` shares a house with every cell of this element and is not one of them
    pub fn seen_by(&self, state: &dyn PuzzleView, cell: Cell) -> bool {
        self.cells().iter().all(|&c| state.sees(c, cell))
    }

    pub fn transposed(&self) -> Self {
        let transpose = |cells: &[Cell]| -> Vec<Cell> {
            cells.iter().map(|c| c.transposed()).sorted().collect()
        };
        match self {
            LinkElement::Candidate(c) => LinkElement::Candidate(c.transposed()),
            LinkElement::PointingSet { value, cells } => LinkElement::PointingSet {
                value: *value,
                cells: transpose(cells),
            },
            LinkElement::AlmostLockedSet {
                value,
                cells,
                locked,
            } => LinkElement::AlmostLockedSet {
                value: *value,
                cells: transpose(cells),
                locked: transpose(locked),
            },
        }
    }
}

impl Rank for LinkElement {
    fn rank(&self) -> usize {
        match self {
            LinkElement::Candidate(_) => 0,
            LinkElement::PointingSet { .. } => 1,
            LinkElement::AlmostLockedSet { locked, .. } => locked.len(),
        }
    }
}

impl From<CellCandidate> for LinkElement {
    fn from(candidate: CellCandidate) -> Self {
        LinkElement::Candidate(candidate)
    }
}

impl fmt::Display for LinkElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkElement::Candidate(c) => write!(f, "{}", c),
            LinkElement::PointingSet { value, cells } => {
                write!(f, "{}{{{}}}", value, cells.iter().join(","))
            }
            LinkElement::AlmostLockedSet { value, cells, locked } => write!(
                f,
                "{}{{{}}} in ALS {{{}}}",
                value,
                cells.iter().join(","),
                locked.iter().join(",")
            ),
        }
    }
}

impl fmt::Debug for LinkElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{LinkElement, Rank};
    use crate::puzzle::{Cell, CellCandidate};

    #[test]
    fn single_cell_group_is_candidate() {
        let e = LinkElement::group(4, vec![Cell::new(1, 1)], None);
        assert_eq!(
            LinkElement::Candidate(CellCandidate::new(Cell::new(1, 1), 4)),
            e
        );
        assert_eq!(0, e.rank());
    }

    #[test]
    fn group_cells_sorted() {
        let e = LinkElement::group(4, vec![Cell::new(0, 2), Cell::new(0, 1)], None);
        assert_eq!(&[Cell::new(0, 1), Cell::new(0, 2)], e.cells());
        assert_eq!("4{r1c2,r1c3}", e.to_string());
        assert_eq!(1, e.rank());
    }

    #[test]
    fn als_rank_is_set_size() {
        let locked = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 5)];
        let e = LinkElement::group(7, vec![Cell::new(0, 0), Cell::new(0, 5)], Some(&locked[..]));
        assert_eq!(3, e.rank());
        assert_eq!(7, e.value());
    }

    #[test]
    fn disjoint() {
        let a = LinkElement::group(4, vec![Cell::new(0, 0), Cell::new(0, 1)], None);
        let b = LinkElement::group(4, vec![Cell::new(0, 1), Cell::new(0, 2)], None);
        let c = LinkElement::group(4, vec![Cell::new(0, 4), Cell::new(0, 5)], None);
        assert!(!a.is_disjoint(&b));
        assert!(a.is_disjoint(&c));
    }
}
