use crate::graph::positions;
use crate::puzzle::{CellCandidate, PuzzleView};
use crate::solve::{ChangeBuffer, CommitPolicy, HighlightColor, HighlightCompiler, Report};
use crate::strategy::Strategy;

/// When every position of a value in a complete house lies inside a second
/// house, the value is removed from the rest of the second house. Covers both
/// pointing (box to line) and claiming (line to box).
#[derive(Clone, Copy, Debug, Default)]
pub struct LockedCandidates;

impl Strategy for LockedCandidates {
    fn name(&self) -> &'static str {
        "Locked Candidates"
    }

    fn difficulty(&self) -> u32 {
        3
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::WaitForAll
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        let domain_size = state.domain_size();
        let houses = state.houses();
        for house in houses {
            if !house.is_complete(domain_size) {
                continue;
            }
            for value in 1..=domain_size as u8 {
                let locked = positions(state, house.cells(), value);
                if locked.len() < 2 {
                    continue;
                }
                for other in houses {
                    if other.kind() == house.kind() || !locked.iter().all(|&c| other.contains(c)) {
                        continue;
                    }
                    for &cell in other.cells() {
                        if !house.contains(cell) {
                            buffer.propose_removal(CellCandidate::new(cell, value));
                        }
                    }
                    let from = house.kind();
                    let to = other.kind();
                    let locked = locked.clone();
                    buffer.commit(move |changes, _| {
                        let mut compiler = HighlightCompiler::new();
                        for &cell in &locked {
                            compiler.candidate(CellCandidate::new(cell, value), HighlightColor::Focus);
                        }
                        let highlights = compiler.changes(changes).finish();
                        Ok(Report::new(
                            format!("in {}, {} is locked to {}", from, value, to),
                            highlights,
                        ))
                    });
                }
            }
        }
    }
}
