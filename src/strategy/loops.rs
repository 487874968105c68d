use crate::graph::{
    BivalueCellRule, CellWeakRule, ConjugatePairRule, HouseWeakRule, LinkElement, LinkGraph,
    Loop, PointingSetRule, Strength, StrengthFilter,
};
use crate::puzzle::{CellCandidate, PuzzleView};
use crate::solve::{ChangeBuffer, HighlightCompiler, Report};
use crate::strategy::chains::ChainSearch;
use crate::strategy::Strategy;

/// A closed alternating chain. Each weak link of the loop joins two elements
/// of which exactly one is true, so anything weakly linked to both ends of a
/// weak link is false.
#[derive(Clone, Copy, Debug)]
pub struct ContinuousLoop {
    max_length: usize,
}

impl ContinuousLoop {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Default for ContinuousLoop {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Strategy for ContinuousLoop {
    fn name(&self) -> &'static str {
        "Continuous Loop"
    }

    fn difficulty(&self) -> u32 {
        7
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        let graph = LinkGraph::build(
            state,
            &[
                &BivalueCellRule,
                &CellWeakRule,
                &ConjugatePairRule,
                &HouseWeakRule,
                &PointingSetRule,
            ],
        );
        let starts: Vec<LinkElement> = graph.vertices().filter(|v| v.is_candidate()).cloned().collect();
        let mut search = ChainSearch::new(&graph, self.max_length);
        for start in starts {
            let found = search.run(start, &mut |chain| {
                if chain.len() < 4
                    || !graph.are_neighbors(chain.end(), chain.start(), StrengthFilter::Weak)
                {
                    return false;
                }
                let cycle = match chain.try_close_as_loop(Strength::Weak) {
                    Some(cycle) if cycle.is_alternating() => cycle,
                    _ => return false,
                };
                let targets = eliminations(state, &graph, &cycle);
                if targets.is_empty() {
                    return false;
                }
                for target in targets {
                    buffer.propose_removal(target);
                }
                buffer.commit_ranked(chain.rank(), move |changes, _| {
                    let highlights = HighlightCompiler::new().cycle(&cycle).changes(changes).finish();
                    Ok(Report::new(format!("continuous loop {}", cycle), highlights))
                })
            });
            if found {
                debug!("found a continuous loop");
                return;
            }
        }
    }
}

fn eliminations(
    state: &dyn PuzzleView,
    graph: &LinkGraph<LinkElement>,
    cycle: &Loop<LinkElement>,
) -> Vec<CellCandidate> {
    let mut targets = Vec::new();
    cycle.for_each_link(Strength::Weak, |a, b| {
        for v in graph.neighbors(a, StrengthFilter::Weak) {
            if !graph.are_neighbors(b, v, StrengthFilter::Weak) || cycle.vertices().contains(v) {
                continue;
            }
            if let Some(c) = v.candidate() {
                if state.has_candidate(c) && !targets.contains(&c) {
                    targets.push(c);
                }
            }
        }
    });
    targets
}
