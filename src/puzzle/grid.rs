//! A square grid puzzle whose topology is a list of houses

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::collections::Square;
use crate::error::{InvalidPuzzle, ParsePuzzleError, PuzzleFromFileError};
use crate::puzzle::parse::parse_grid;
use crate::puzzle::{
    CandidateSet, Cell, House, HouseKind, MutationSink, PuzzleView, Value, MAX_DOMAIN,
};

/// The house layout used when reading a grid from text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    /// Rows, columns and rectangular boxes
    Sudoku,
    /// Rows and columns only
    Latin,
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sudoku" => Ok(Family::Sudoku),
            "latin" => Ok(Family::Latin),
            _ => Err(format!("unknown puzzle family: {}", s)),
        }
    }
}

#[derive(Debug)]
struct Layout {
    houses: Vec<House>,
    cell_houses: Square<Vec<usize>>,
}

impl Layout {
    fn new(width: usize, houses: Vec<House>) -> Self {
        let mut cell_houses: Square<Vec<usize>> = Square::with_width(width);
        for (i, house) in houses.iter().enumerate() {
            for &cell in house.cells() {
                cell_houses[cell].push(i);
            }
        }
        Self {
            houses,
            cell_houses,
        }
    }
}

/// A grid of `width * width` cells with values `1..=width`
#[derive(Clone, Debug)]
pub struct Grid {
    values: Square<Option<Value>>,
    candidates: Square<CandidateSet>,
    layout: Arc<Layout>,
}

impl Grid {
    /// A Sudoku-style grid with `box_rows * box_cols` cells per box
    pub fn sudoku(box_rows: usize, box_cols: usize) -> Result<Self, InvalidPuzzle> {
        let width = box_rows * box_cols;
        check_width(width)?;
        let mut houses = lines(width);
        for b in 0..width {
            let top = b / box_rows * box_rows;
            let left = b % box_rows * box_cols;
            let cells = (0..width)
                .map(|i| Cell::new(top + i / box_cols, left + i % box_cols))
                .collect();
            houses.push(House::new(HouseKind::Block(b), cells));
        }
        Ok(Self::with_houses(width, houses))
    }

    /// A Latin square: every row and column holds each value once
    pub fn latin_square(width: usize) -> Result<Self, InvalidPuzzle> {
        check_width(width)?;
        Ok(Self::with_houses(width, lines(width)))
    }

    /// A grid with rows, columns and one house per distinct region id
    pub fn with_regions(regions: &Square<usize>) -> Result<Self, InvalidPuzzle> {
        let width = regions.width();
        check_width(width)?;
        let mut region_cells = vec![Vec::new(); width];
        for (cell, &region) in regions.iter_cell() {
            let cells = region_cells.get_mut(region).ok_or_else(|| {
                InvalidPuzzle::new(format!("region id {} at {} is out of range", region, cell))
            })?;
            cells.push(cell);
        }
        let mut houses = lines(width);
        for (i, cells) in region_cells.into_iter().enumerate() {
            if cells.len() != width {
                return Err(InvalidPuzzle::new(format!(
                    "region {} has {} cells, expected {}",
                    i + 1,
                    cells.len(),
                    width
                )));
            }
            houses.push(House::new(HouseKind::Region(i), cells));
        }
        Ok(Self::with_houses(width, houses))
    }

    fn with_houses(width: usize, houses: Vec<House>) -> Self {
        Self {
            values: Square::with_width(width),
            candidates: Square::with_width_and_value(width, CandidateSet::with_all(width)),
            layout: Arc::new(Layout::new(width, houses)),
        }
    }

    pub fn parse(s: &str, family: Family) -> Result<Self, ParsePuzzleError> {
        parse_grid(s, family)
    }

    pub fn from_file(path: &Path, family: Family) -> Result<Self, PuzzleFromFileError> {
        let s = fs::read_to_string(path)?;
        Ok(Self::parse(&s, family)?)
    }

    /// Places a given value. Fails if the value is outside the domain or already
    /// excluded by another value in a shared house.
    pub fn give(&mut self, cell: Cell, value: Value) -> Result<(), InvalidPuzzle> {
        let width = self.width();
        if cell.row >= width || cell.col >= width {
            return Err(InvalidPuzzle::new(format!("{} is outside the grid", cell)));
        }
        if value == 0 || usize::from(value) > width {
            return Err(InvalidPuzzle::new(format!(
                "value {} at {} is out of range",
                value, cell
            )));
        }
        if let Some(existing) = self.values[cell] {
            return Err(InvalidPuzzle::new(format!(
                "{} already holds {}",
                cell, existing
            )));
        }
        if !self.candidates[cell].contains(value) {
            return Err(InvalidPuzzle::new(format!(
                "value {} at {} repeats a value in one of its houses",
                value, cell
            )));
        }
        self.set_value(cell, value);
        Ok(())
    }

    /// Overwrites the candidates of an unsolved cell
    pub fn set_candidates(&mut self, cell: Cell, candidates: CandidateSet) {
        if self.values[cell].is_none() {
            self.candidates[cell] = candidates;
        }
    }

    /// A copy of the grid mirrored along its main diagonal
    pub fn transposed(&self) -> Self {
        let houses = self.layout.houses.iter().map(House::transposed).collect();
        Self {
            values: self.values.transposed(),
            candidates: self.candidates.transposed(),
            layout: Arc::new(Layout::new(self.width(), houses)),
        }
    }

    pub fn values(&self) -> &Square<Option<Value>> {
        &self.values
    }
}

impl PuzzleView for Grid {
    fn width(&self) -> usize {
        self.values.width()
    }

    fn domain_size(&self) -> usize {
        self.values.width()
    }

    fn candidates_at(&self, cell: Cell) -> CandidateSet {
        self.candidates[cell]
    }

    fn value_at(&self, cell: Cell) -> Option<Value> {
        self.values[cell]
    }

    fn houses(&self) -> &[House] {
        &self.layout.houses
    }

    fn houses_of(&self, cell: Cell) -> Vec<usize> {
        self.layout.cell_houses[cell].clone()
    }

    fn sees(&self, a: Cell, b: Cell) -> bool {
        a != b
            && self.layout.cell_houses[a]
                .iter()
                .any(|&h| self.layout.houses[h].contains(b))
    }
}

impl MutationSink for Grid {
    fn set_value(&mut self, cell: Cell, value: Value) {
        if self.values[cell].is_some() {
            return;
        }
        self.values[cell] = Some(value);
        self.candidates[cell] = CandidateSet::new();
        let layout = Arc::clone(&self.layout);
        for &h in &layout.cell_houses[cell] {
            for &peer in layout.houses[h].cells() {
                self.candidates[peer].remove(value);
            }
        }
    }

    fn remove_candidate(&mut self, cell: Cell, value: Value) {
        if self.values[cell].is_none() {
            self.candidates[cell].remove(value);
        }
    }
}

impl FromStr for Grid {
    type Err = ParsePuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_grid(s, Family::Sudoku)
    }
}

fn check_width(width: usize) -> Result<(), InvalidPuzzle> {
    if width == 0 || width > MAX_DOMAIN {
        return Err(InvalidPuzzle::new(format!(
            "grid width {} is not in 1..={}",
            width, MAX_DOMAIN
        )));
    }
    Ok(())
}

fn lines(width: usize) -> Vec<House> {
    let rows = (0..width).map(|r| {
        House::new(
            HouseKind::Row(r),
            (0..width).map(|c| Cell::new(r, c)).collect(),
        )
    });
    let columns = (0..width).map(|c| {
        House::new(
            HouseKind::Column(c),
            (0..width).map(|r| Cell::new(r, c)).collect(),
        )
    });
    rows.chain(columns).collect()
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use crate::collections::Square;
    use crate::puzzle::{CandidateSet, Cell, Grid, HouseKind, MutationSink, PuzzleView};

    #[test]
    fn sudoku_houses() {
        let grid = Grid::sudoku(3, 3).unwrap();
        assert_eq!(27, grid.houses().len());
        let houses = grid.houses_of(Cell::new(4, 7));
        let kinds: Vec<_> = houses.iter().map(|&h| grid.houses()[h].kind()).collect();
        assert_eq!(
            vec![HouseKind::Row(4), HouseKind::Column(7), HouseKind::Block(5)],
            kinds
        );
    }

    #[test]
    fn six_by_six_boxes() {
        let grid = Grid::sudoku(2, 3).unwrap();
        assert!(grid.sees(Cell::new(0, 0), Cell::new(1, 2)));
        assert!(!grid.sees(Cell::new(0, 0), Cell::new(2, 2)));
        assert!(!grid.sees(Cell::new(0, 0), Cell::new(1, 3)));
    }

    #[test]
    fn set_value_removes_from_peers() {
        let mut grid = Grid::sudoku(3, 3).unwrap();
        grid.set_value(Cell::new(0, 0), 5);
        assert_eq!(Some(5), grid.value_at(Cell::new(0, 0)));
        assert!(grid.candidates_at(Cell::new(0, 0)).is_empty());
        assert!(!grid.candidates_at(Cell::new(0, 8)).contains(5));
        assert!(!grid.candidates_at(Cell::new(8, 0)).contains(5));
        assert!(!grid.candidates_at(Cell::new(2, 2)).contains(5));
        assert!(grid.candidates_at(Cell::new(3, 3)).contains(5));
    }

    #[test]
    fn give_rejects_repeated_value() {
        let mut grid = Grid::latin_square(4).unwrap();
        grid.give(Cell::new(0, 0), 2).unwrap();
        assert!(grid.give(Cell::new(0, 3), 2).is_err());
        assert!(grid.give(Cell::new(1, 1), 5).is_err());
        assert!(grid.give(Cell::new(1, 1), 2).is_ok());
    }

    #[test]
    fn regions_must_be_full() {
        let regions = Square::try_from(vec![0, 0, 1, 1]).unwrap();
        assert!(Grid::with_regions(&regions).is_ok());
        let regions = Square::try_from(vec![0, 0, 0, 1]).unwrap();
        assert!(Grid::with_regions(&regions).is_err());
    }

    #[test]
    fn transposed() {
        let mut grid = Grid::sudoku(2, 3).unwrap();
        grid.give(Cell::new(0, 4), 3).unwrap();
        grid.set_candidates(Cell::new(5, 1), CandidateSet::from_values(&[1, 2]));
        let t = grid.transposed();
        assert_eq!(Some(3), t.value_at(Cell::new(4, 0)));
        assert_eq!(
            CandidateSet::from_values(&[1, 2]),
            t.candidates_at(Cell::new(1, 5))
        );
        assert!(t.sees(Cell::new(0, 0), Cell::new(2, 1)));
        assert!(!t.sees(Cell::new(0, 0), Cell::new(1, 2)));
    }
}
