use std::fmt;

use crate::puzzle::Cell;

/// Identifies what kind of unit a house is and its position among houses of that kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HouseKind {
    Row(usize),
    Column(usize),
    Block(usize),
    Region(usize),
}

impl HouseKind {
    pub fn is_line(self) -> bool {
        matches!(self, HouseKind::Row(_) | HouseKind::Column(_))
    }

    fn transposed(self) -> Self {
        match self {
            HouseKind::Row(i) => HouseKind::Column(i),
            HouseKind::Column(i) => HouseKind::Row(i),
            other => other,
        }
    }
}

/// A set of cells that must hold distinct values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct House {
    kind: HouseKind,
    cells: Vec<Cell>,
}

impl House {
    pub fn new(kind: HouseKind, mut cells: Vec<Cell>) -> Self {
        cells.sort();
        cells.dedup();
        Self { kind, cells }
    }

    pub fn kind(&self) -> HouseKind {
        self.kind
    }

    /// The cells of the house, sorted in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// A complete house has one cell per value, so every value must appear in it
    pub fn is_complete(&self, domain_size: usize) -> bool {
        self.cells.len() == domain_size
    }

    pub fn transposed(&self) -> Self {
        Self::new(
            self.kind.transposed(),
            self.cells.iter().map(|c| c.transposed()).collect(),
        )
    }
}

impl fmt::Display for HouseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseKind::Row(i) => write!(f, "row {}", i + 1),
            HouseKind::Column(i) => write!(f, "column {}", i + 1),
            HouseKind::Block(i) => write!(f, "box {}", i + 1),
            HouseKind::Region(i) => write!(f, "region {}", i + 1),
        }
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}
