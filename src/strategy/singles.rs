use crate::graph::positions;
use crate::puzzle::{CellCandidate, PuzzleView};
use crate::solve::{ChangeBuffer, CommitPolicy, HighlightColor, HighlightCompiler, Report};
use crate::strategy::{unsolved_cells, Strategy};

/// A cell with one candidate left holds that candidate
#[derive(Clone, Copy, Debug, Default)]
pub struct NakedSingle;

/// A value with one position left in a complete house goes there
#[derive(Clone, Copy, Debug, Default)]
pub struct HiddenSingle;

impl Strategy for NakedSingle {
    fn name(&self) -> &'static str {
        "Naked Single"
    }

    fn difficulty(&self) -> u32 {
        1
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::WaitForAll
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        for cell in unsolved_cells(state) {
            let value = match state.candidates_at(cell).single_value() {
                Some(value) => value,
                None => continue,
            };
            buffer.propose_placement(CellCandidate::new(cell, value));
            buffer.commit(move |changes, _| {
                let highlights = HighlightCompiler::new()
                    .cell(cell, HighlightColor::Focus)
                    .changes(changes)
                    .finish();
                Ok(Report::new(
                    format!("{} can only be {}", cell, value),
                    highlights,
                ))
            });
        }
    }
}

impl Strategy for HiddenSingle {
    fn name(&self) -> &'static str {
        "Hidden Single"
    }

    fn difficulty(&self) -> u32 {
        2
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::WaitForAll
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        let domain_size = state.domain_size();
        for house in state.houses() {
            if !house.is_complete(domain_size) {
                continue;
            }
            for value in 1..=domain_size as u8 {
                let cell = match positions(state, house.cells(), value).as_slice() {
                    &[cell] => cell,
                    _ => continue,
                };
                let kind = house.kind();
                let cells = house.cells().to_vec();
                buffer.propose_placement(CellCandidate::new(cell, value));
                buffer.commit(move |changes, _| {
                    let mut compiler = HighlightCompiler::new();
                    for &c in &cells {
                        compiler.cell(c, HighlightColor::Focus);
                    }
                    let highlights = compiler.changes(changes).finish();
                    Ok(Report::new(
                        format!("{} can only go in {} in {}", value, cell, kind),
                        highlights,
                    ))
                });
            }
        }
    }
}
