//! Alternating inference chains
//!
//! A chain that starts and ends with a strong link proves that one of its two
//! ends is true. Any candidate weakly linked to both ends is false.

use std::cmp::Ordering;

use crate::graph::{
    AlmostLockedSetRule, BivalueCellRule, CellWeakRule, Chain, ConjugatePairRule, HouseWeakRule,
    LinkElement, LinkGraph, LinkRule, PointingSetRule, Strength, StrengthFilter,
};
use crate::puzzle::{CellCandidate, PuzzleView};
use crate::solve::{ChangeBuffer, Commit, CommitPolicy, HighlightCompiler, Report};
use crate::strategy::Strategy;
use crate::HashSet;

const MAX_COMMITS: usize = 16;

#[derive(Clone, Copy, Debug)]
pub struct AlternatingChain {
    max_length: usize,
}

impl AlternatingChain {
    /// `max_length` counts vertices
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Default for AlternatingChain {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Alternating chains that may pass through almost locked sets
#[derive(Clone, Copy, Debug)]
pub struct AlsChain {
    max_length: usize,
    max_als_size: usize,
}

impl AlsChain {
    pub fn new(max_length: usize, max_als_size: usize) -> Self {
        Self {
            max_length,
            max_als_size,
        }
    }
}

impl Default for AlsChain {
    fn default() -> Self {
        Self::new(8, 3)
    }
}

/// Prefers the simplest chain, then the commit with the most effect
fn simplest_chain(a: &Commit, b: &Commit) -> Ordering {
    b.rank()
        .cmp(&a.rank())
        .then_with(|| a.weight().cmp(&b.weight()))
}

impl Strategy for AlternatingChain {
    fn name(&self) -> &'static str {
        "Alternating Chain"
    }

    fn difficulty(&self) -> u32 {
        6
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::ChooseBest(Some(simplest_chain))
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
        find_chains(state, &graph, self.max_length, buffer);
    }
}

impl Strategy for AlsChain {
    fn name(&self) -> &'static str {
        "ALS Chain"
    }

    fn difficulty(&self) -> u32 {
        8
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::ChooseBest(None)
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        let als = AlmostLockedSetRule::new(self.max_als_size);
        let rules: [&dyn LinkRule; 6] = [
            &BivalueCellRule,
            &CellWeakRule,
            &ConjugatePairRule,
            &HouseWeakRule,
            &PointingSetRule,
            &als,
        ];
        let graph = LinkGraph::build(state, &rules);
        find_chains(state, &graph, self.max_length, buffer);
    }
}

/// Commits the eliminations of chains from every candidate, up to a limit
fn find_chains(
    state: &dyn PuzzleView,
    graph: &LinkGraph<LinkElement>,
    max_length: usize,
    buffer: &mut ChangeBuffer<'_>,
) {
    let starts: Vec<LinkElement> = graph.vertices().filter(|v| v.is_candidate()).cloned().collect();
    let mut count = 0;
    for start in starts {
        let mut search = ChainSearch::new(graph, max_length);
        search.run(start, &mut |chain| {
            let targets = eliminations(state, graph, chain);
            if targets.is_empty() {
                return false;
            }
            for &target in &targets {
                buffer.propose_removal(target);
            }
            let chain = chain.clone();
            if buffer.commit_ranked(chain.rank(), move |changes, _| {
                let highlights = HighlightCompiler::new().chain(&chain).changes(changes).finish();
                Ok(Report::new(
                    format!("{} or {} is true: {}", chain.start(), chain.end(), chain),
                    highlights,
                ))
            }) {
                count += 1;
            }
            count >= MAX_COMMITS
        });
        if count >= MAX_COMMITS {
            break;
        }
    }
    if count > 0 {
        debug!("found {} chain(s)", count);
    }
}

/// Candidates weakly linked to both ends of the chain, and not on it
fn eliminations(
    state: &dyn PuzzleView,
    graph: &LinkGraph<LinkElement>,
    chain: &Chain<LinkElement>,
) -> Vec<CellCandidate> {
    graph
        .neighbors(chain.end(), StrengthFilter::Weak)
        .filter(|&v| graph.are_neighbors(chain.start(), v, StrengthFilter::Weak))
        .filter(|v| !chain.contains(v))
        .filter_map(LinkElement::candidate)
        .filter(|&c| state.has_candidate(c))
        .collect()
}

/// Depth-first search over alternating chains that begin with a strong link.
/// A vertex is expanded at most once per arriving strength, which bounds the
/// search at the cost of missing some longer chains.
pub(crate) struct ChainSearch<'g> {
    graph: &'g LinkGraph<LinkElement>,
    max_length: usize,
    visited: HashSet<(LinkElement, Strength)>,
}

impl<'g> ChainSearch<'g> {
    pub fn new(graph: &'g LinkGraph<LinkElement>, max_length: usize) -> Self {
        Self {
            graph,
            max_length,
            visited: HashSet::default(),
        }
    }

    /// Calls `visit` with every chain from `start` that ends with a strong link
    /// until it returns true
    pub fn run(
        &mut self,
        start: LinkElement,
        visit: &mut dyn FnMut(&Chain<LinkElement>) -> bool,
    ) -> bool {
        self.visited.clear();
        let mut chain = Chain::new(start);
        self.extend(&mut chain, visit)
    }

    fn extend(
        &mut self,
        chain: &mut Chain<LinkElement>,
        visit: &mut dyn FnMut(&Chain<LinkElement>) -> bool,
    ) -> bool {
        if chain.len() >= self.max_length {
            return false;
        }
        let strength = match chain.last_strength() {
            Some(Strength::Strong) => Strength::Weak,
            Some(Strength::Weak) | None => Strength::Strong,
        };
        let graph = self.graph;
        for next in graph.neighbors(chain.end(), strength.into()) {
            if !self.visited.insert((next.clone(), strength)) || !chain.add(strength, next.clone()) {
                continue;
            }
            let stop = (strength == Strength::Strong && visit(chain)) || self.extend(chain, visit);
            chain.remove_last();
            if stop {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{
        BivalueCellRule, CellWeakRule, ConjugatePairRule, HouseWeakRule, LinkElement, LinkGraph,
    };
    use crate::puzzle::{CandidateSet, Cell, CellCandidate, Grid, PuzzleView};
    use crate::solve::{Change, ChangeBuffer};
    use crate::strategy::chains::ChainSearch;
    use crate::strategy::{AlternatingChain, Strategy};

    /// An XY-wing: r1c1 {1,2}, r1c4 {2,3} and r4c1 {1,3}. Either r1c4 or r4c1
    /// is 3, so r4c4 is not 3.
    fn xy_wing() -> Grid {
        let mut grid = Grid::latin_square(6).unwrap();
        grid.set_candidates(Cell::new(0, 0), CandidateSet::from_values(&[1, 2]));
        grid.set_candidates(Cell::new(0, 3), CandidateSet::from_values(&[2, 3]));
        grid.set_candidates(Cell::new(3, 0), CandidateSet::from_values(&[1, 3]));
        grid
    }

    #[test]
    fn chains_end_with_strong_links() {
        let grid = xy_wing();
        let graph = LinkGraph::build(&grid, &[&BivalueCellRule, &CellWeakRule]);
        let mut lengths = Vec::new();
        ChainSearch::new(&graph, 10).run(
            LinkElement::candidate_at(Cell::new(0, 3), 3),
            &mut |chain| {
                assert!(chain.is_alternating());
                lengths.push(chain.len());
                false
            },
        );
        // no weak links between cells, so only the bivalue link itself
        assert_eq!(vec![2], lengths);
    }

    #[test]
    fn xy_wing_elimination() {
        let grid = xy_wing();
        let graph = LinkGraph::build(
            &grid,
            &[
                &BivalueCellRule,
                &CellWeakRule,
                &ConjugatePairRule,
                &HouseWeakRule,
            ],
        );
        let mut found = false;
        ChainSearch::new(&graph, 6).run(
            LinkElement::candidate_at(Cell::new(0, 3), 3),
            &mut |chain| {
                let targets = super::eliminations(&grid, &graph, chain);
                if chain.end() == &LinkElement::candidate_at(Cell::new(3, 0), 3) {
                    assert_eq!(vec![CellCandidate::new(Cell::new(3, 3), 3)], targets);
                    found = true;
                }
                false
            },
        );
        assert!(found);
    }

    #[test]
    fn strategy_commits_sound_eliminations() {
        let grid = xy_wing();
        let mut buffer = ChangeBuffer::new(&grid);
        AlternatingChain::default().apply(&grid, &mut buffer);
        let pending = buffer.into_pending();
        assert!(!pending.is_empty());
        let removal = Change::Removal(CellCandidate::new(Cell::new(3, 3), 3));
        assert!(pending
            .commits()
            .iter()
            .any(|commit| commit.changes().contains(&removal)));
        for commit in pending.commits() {
            for change in commit.changes() {
                assert!(!change.is_placement());
                assert!(grid.has_candidate(change.candidate()));
            }
        }
    }
}
