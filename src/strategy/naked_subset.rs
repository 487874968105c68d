use itertools::Itertools;

use crate::puzzle::{CandidateSet, Cell, CellCandidate, PuzzleView};
use crate::solve::{ChangeBuffer, HighlightColor, HighlightCompiler, Report};
use crate::strategy::{join_cells, Strategy};

/// N cells of a house sharing N candidates between them. Those values are
/// removed from the rest of the house.
#[derive(Clone, Copy, Debug)]
pub struct NakedSubset {
    max_size: usize,
}

impl NakedSubset {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

impl Default for NakedSubset {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Strategy for NakedSubset {
    fn name(&self) -> &'static str {
        "Naked Subset"
    }

    fn difficulty(&self) -> u32 {
        4
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        for house in state.houses() {
            let unsolved: Vec<Cell> = house
                .cells()
                .iter()
                .copied()
                .filter(|&c| state.value_at(c).is_none())
                .collect();
            for size in 2..=self.max_size.min(unsolved.len().saturating_sub(1)) {
                let small = unsolved
                    .iter()
                    .copied()
                    .filter(|&c| state.candidates_at(c).len() <= size);
                for subset in small.combinations(size) {
                    let values: CandidateSet = subset
                        .iter()
                        .map(|&c| state.candidates_at(c))
                        .fold(CandidateSet::new(), |a, b| a | b);
                    if values.len() != size {
                        continue;
                    }
                    for &cell in &unsolved {
                        if subset.contains(&cell) {
                            continue;
                        }
                        for value in values {
                            buffer.propose_removal(CellCandidate::new(cell, value));
                        }
                    }
                    let kind = house.kind();
                    let committed = buffer.commit(move |changes, _| {
                        let mut compiler = HighlightCompiler::new();
                        for &cell in &subset {
                            for value in values {
                                compiler.candidate(CellCandidate::new(cell, value), HighlightColor::Focus);
                            }
                        }
                        let highlights = compiler.changes(changes).finish();
                        Ok(Report::new(
                            format!(
                                "{} are locked to {} in {}",
                                values.iter().join(", "),
                                join_cells(&subset),
                                kind
                            ),
                            highlights,
                        ))
                    });
                    if committed {
                        debug!("naked subset of {} found in {}", size, kind);
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::puzzle::{CandidateSet, Cell, CellCandidate, Grid};
    use crate::solve::{Change, ChangeBuffer};
    use crate::strategy::{NakedSubset, Strategy};

    #[test]
    fn naked_pair_in_row() {
        let mut grid = Grid::latin_square(4).unwrap();
        grid.set_candidates(Cell::new(0, 0), CandidateSet::from_values(&[1, 2]));
        grid.set_candidates(Cell::new(0, 3), CandidateSet::from_values(&[1, 2]));
        let mut buffer = ChangeBuffer::new(&grid);
        NakedSubset::default().apply(&grid, &mut buffer);
        let pending = buffer.into_pending();
        assert_eq!(1, pending.len());
        assert_eq!(
            &[
                Change::Removal(CellCandidate::new(Cell::new(0, 1), 1)),
                Change::Removal(CellCandidate::new(Cell::new(0, 1), 2)),
                Change::Removal(CellCandidate::new(Cell::new(0, 2), 1)),
                Change::Removal(CellCandidate::new(Cell::new(0, 2), 2)),
            ],
            pending.commits()[0].changes()
        );
    }

    #[test]
    fn subset_without_effect_is_not_committed() {
        let mut grid = Grid::latin_square(3).unwrap();
        grid.set_candidates(Cell::new(0, 0), CandidateSet::from_values(&[1, 2]));
        grid.set_candidates(Cell::new(0, 1), CandidateSet::from_values(&[1, 2]));
        grid.set_candidates(Cell::new(0, 2), CandidateSet::from_values(&[3]));
        let mut buffer = ChangeBuffer::new(&grid);
        NakedSubset::default().apply(&grid, &mut buffer);
        assert_eq!(0, buffer.commit_count());
    }
}
