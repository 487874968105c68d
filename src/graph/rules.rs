//! Rules that populate a link graph from the current candidates
//!
//! Every rule is a pure function of the puzzle state. Running a rule twice, or
//! running rules in a different order, yields the same graph.

use itertools::Itertools;

use crate::graph::{Direction, LinkElement, LinkGraph, Strength};
use crate::puzzle::{CandidateSet, Cell, CellCandidate, House, PuzzleView, Value};
use crate::HashSet;

pub trait LinkRule {
    fn add_links(&self, state: &dyn PuzzleView, graph: &mut LinkGraph<LinkElement>);
}

/// The two candidates of a bivalue cell are strongly (and weakly) linked
pub struct BivalueCellRule;

/// Any two candidates of one cell are weakly linked
pub struct CellWeakRule;

/// A value with exactly two positions in a complete house links them strongly (and weakly)
pub struct ConjugatePairRule;

/// Any two positions of a value in one house are weakly linked
pub struct HouseWeakRule;

/// Groups the positions of a value in a box/line intersection
pub struct PointingSetRule;

/// Groups the positions of each value inside an almost locked set
pub struct AlmostLockedSetRule {
    max_size: usize,
}

impl LinkRule for BivalueCellRule {
    fn add_links(&self, state: &dyn PuzzleView, graph: &mut LinkGraph<LinkElement>) {
        for cell in unsolved_cells(state) {
            if let Some((a, b)) = state.candidates_at(cell).iter().collect_tuple() {
                let a = LinkElement::candidate_at(cell, a);
                let b = LinkElement::candidate_at(cell, b);
                graph.add(a.clone(), b.clone(), Strength::Strong, Direction::Bidirectional);
                graph.add(a, b, Strength::Weak, Direction::Bidirectional);
            }
        }
    }
}

impl LinkRule for CellWeakRule {
    fn add_links(&self, state: &dyn PuzzleView, graph: &mut LinkGraph<LinkElement>) {
        for cell in unsolved_cells(state) {
            for (a, b) in state.candidates_at(cell).iter().tuple_combinations() {
                graph.add(
                    LinkElement::candidate_at(cell, a),
                    LinkElement::candidate_at(cell, b),
                    Strength::Weak,
                    Direction::Bidirectional,
                );
            }
        }
    }
}

impl LinkRule for ConjugatePairRule {
    fn add_links(&self, state: &dyn PuzzleView, graph: &mut LinkGraph<LinkElement>) {
        let domain_size = state.domain_size();
        for house in state.houses() {
            if !house.is_complete(domain_size) {
                continue;
            }
            for value in values(state) {
                if let Some((a, b)) = positions(state, house.cells(), value)
                    .into_iter()
                    .collect_tuple()
                {
                    let a = LinkElement::candidate_at(a, value);
                    let b = LinkElement::candidate_at(b, value);
                    graph.add(a.clone(), b.clone(), Strength::Strong, Direction::Bidirectional);
                    graph.add(a, b, Strength::Weak, Direction::Bidirectional);
                }
            }
        }
    }
}

impl LinkRule for HouseWeakRule {
    fn add_links(&self, state: &dyn PuzzleView, graph: &mut LinkGraph<LinkElement>) {
        for house in state.houses() {
            for value in values(state) {
                for (a, b) in positions(state, house.cells(), value)
                    .into_iter()
                    .tuple_combinations()
                {
                    graph.add(
                        LinkElement::candidate_at(a, value),
                        LinkElement::candidate_at(b, value),
                        Strength::Weak,
                        Direction::Bidirectional,
                    );
                }
            }
        }
    }
}

struct PointingSet<'a> {
    element: LinkElement,
    block: &'a House,
    line: &'a House,
}

impl PointingSetRule {
    fn pointing_sets<'a>(state: &'a dyn PuzzleView) -> Vec<PointingSet<'a>> {
        let houses = state.houses();
        let mut sets = Vec::new();
        for block in houses.iter().filter(|h| !h.kind().is_line()) {
            for line in houses.iter().filter(|h| h.kind().is_line()) {
                let intersection: Vec<Cell> = block
                    .cells()
                    .iter()
                    .copied()
                    .filter(|&c| line.contains(c))
                    .collect();
                if intersection.len() < 2 {
                    continue;
                }
                for value in values(state) {
                    let cells = positions(state, &intersection, value);
                    if cells.len() >= 2 {
                        sets.push(PointingSet {
                            element: LinkElement::group(value, cells, None),
                            block,
                            line,
                        });
                    }
                }
            }
        }
        sets
    }
}

impl LinkRule for PointingSetRule {
    fn add_links(&self, state: &dyn PuzzleView, graph: &mut LinkGraph<LinkElement>) {
        let sets = Self::pointing_sets(state);
        let elements: HashSet<&LinkElement> = sets.iter().map(|s| &s.element).collect();
        let domain_size = state.domain_size();
        for set in &sets {
            let value = set.element.value();
            for cell in Cell::all(state.width()) {
                if state.has_candidate(CellCandidate::new(cell, value))
                    && set.element.seen_by(state, cell)
                {
                    graph.add(
                        set.element.clone(),
                        LinkElement::candidate_at(cell, value),
                        Strength::Weak,
                        Direction::Bidirectional,
                    );
                }
            }
            // the set and one other element cover the value in a house
            for house in [set.block, set.line].iter() {
                if !house.is_complete(domain_size) {
                    continue;
                }
                let rest: Vec<Cell> = positions(state, house.cells(), value)
                    .into_iter()
                    .filter(|c| !set.element.cells().contains(c))
                    .collect();
                if rest.is_empty() {
                    continue;
                }
                let other = LinkElement::group(value, rest, None);
                if other.is_candidate() || elements.contains(&other) {
                    graph.add(
                        set.element.clone(),
                        other,
                        Strength::Strong,
                        Direction::Bidirectional,
                    );
                }
            }
        }
        for (a, b) in sets.iter().tuple_combinations() {
            if a.element.value() == b.element.value()
                && a.element.is_disjoint(&b.element)
                && state.houses().iter().any(|h| {
                    a.element.cells().iter().all(|&c| h.contains(c))
                        && b.element.cells().iter().all(|&c| h.contains(c))
                })
            {
                graph.add(
                    a.element.clone(),
                    b.element.clone(),
                    Strength::Weak,
                    Direction::Bidirectional,
                );
            }
        }
    }
}

impl AlmostLockedSetRule {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    /// Every set of 2 to `max_size` unsolved cells of one house holding one
    /// more candidate than cells
    fn almost_locked_sets(&self, state: &dyn PuzzleView) -> Vec<(Vec<Cell>, CandidateSet)> {
        let mut seen: HashSet<Vec<Cell>> = HashSet::default();
        let mut sets = Vec::new();
        for house in state.houses() {
            let cells: Vec<Cell> = house
                .cells()
                .iter()
                .copied()
                .filter(|&c| state.value_at(c).is_none())
                .collect();
            for n in 2..=self.max_size.min(cells.len()) {
                for combination in cells.iter().copied().combinations(n) {
                    let union = combination
                        .iter()
                        .fold(CandidateSet::new(), |acc, &c| acc | state.candidates_at(c));
                    if union.len() == n + 1 && seen.insert(combination.clone()) {
                        sets.push((combination, union));
                    }
                }
            }
        }
        sets
    }
}

impl Default for AlmostLockedSetRule {
    fn default() -> Self {
        Self::new(3)
    }
}

impl LinkRule for AlmostLockedSetRule {
    fn add_links(&self, state: &dyn PuzzleView, graph: &mut LinkGraph<LinkElement>) {
        for (locked, union) in self.almost_locked_sets(state) {
            let groups: Vec<LinkElement> = union
                .iter()
                .map(|value| {
                    let cells = positions(state, &locked, value);
                    LinkElement::group(value, cells, Some(&locked[..]))
                })
                .collect();
            // without one value the rest lock into the set
            for (a, b) in groups.iter().tuple_combinations() {
                graph.add(
                    a.clone(),
                    b.clone(),
                    Strength::Strong,
                    Direction::Bidirectional,
                );
            }
            for group in &groups {
                let value = group.value();
                for cell in Cell::all(state.width()) {
                    if locked.contains(&cell)
                        || !state.has_candidate(CellCandidate::new(cell, value))
                        || !group.seen_by(state, cell)
                    {
                        continue;
                    }
                    let candidate = LinkElement::candidate_at(cell, value);
                    graph.add(
                        candidate.clone(),
                        group.clone(),
                        Strength::Weak,
                        Direction::MonoDirectional,
                    );
                    graph.add(
                        group.clone(),
                        candidate,
                        Strength::Weak,
                        Direction::MonoDirectional,
                    );
                }
            }
        }
    }
}

fn values(state: &dyn PuzzleView) -> impl Iterator<Item = Value> {
    1..=state.domain_size() as Value
}

fn unsolved_cells(state: &dyn PuzzleView) -> impl Iterator<Item = Cell> + '_ {
    Cell::all(state.width()).filter(move |&c| state.value_at(c).is_none())
}

/// The cells among `cells` that still have `value` as a candidate
pub(crate) fn positions(state: &dyn PuzzleView, cells: &[Cell], value: Value) -> Vec<Cell> {
    cells
        .iter()
        .copied()
        .filter(|&c| state.has_candidate(CellCandidate::new(c, value)))
        .collect()
}
