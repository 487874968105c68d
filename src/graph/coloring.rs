//! On/Off label propagation with contradiction detection
//!
//! Seeding a vertex with a label and following the graph derives the labels it
//! forces: an On vertex turns its weak neighbors Off, an Off vertex turns its
//! strong neighbors On. With an exclusion tracker, candidates also follow the
//! puzzle rules directly: an On candidate excludes its peers, and a cell or
//! complete house left with one possible position forces it On.

use std::collections::VecDeque;
use std::ops::Not;

use vec_map::VecMap;

use crate::collections::{LinkedAHashMap, Square};
use crate::graph::{LinkElement, LinkGraph, Strength, StrengthFilter};
use crate::puzzle::{CandidateSet, Cell, CellCandidate, PuzzleView, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    On,
    Off,
}

impl Not for Label {
    type Output = Label;

    fn not(self) -> Self::Output {
        match self {
            Label::On => Label::Off,
            Label::Off => Label::On,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorEntry {
    pub label: Label,
    /// The vertex whose label forced this one, `None` for a seed
    pub parent: Option<LinkElement>,
    /// The kind of link followed from the parent
    pub strength: Option<Strength>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContradictionKind {
    /// A vertex was forced both On and Off
    Conflict(LinkElement),
    /// Every candidate of an unsolved cell is Off
    EmptyCell(Cell),
    /// Every position of a value in a complete house is Off
    EmptyHouse { house: usize, value: Value },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contradiction {
    pub kind: ContradictionKind,
    /// The vertex whose consequences exposed the contradiction
    pub trigger: LinkElement,
    pub seed: LinkElement,
    pub seed_label: Label,
}

impl Contradiction {
    /// The seed cannot take the label it was given. Only sound if every
    /// earlier seed of the same coloring is known to hold.
    pub fn deduction(&self) -> (&LinkElement, Label) {
        (&self.seed, !self.seed_label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColoringOutcome {
    Consistent,
    Contradiction(Contradiction),
}

impl ColoringOutcome {
    pub fn contradiction(&self) -> Option<&Contradiction> {
        match self {
            ColoringOutcome::Consistent => None,
            ColoringOutcome::Contradiction(c) => Some(c),
        }
    }

    pub fn is_contradiction(&self) -> bool {
        self.contradiction().is_some()
    }
}

type Failure = (ContradictionKind, LinkElement);

/// Remaining candidates per cell and remaining positions per value in each
/// complete house, reduced as candidates are labelled Off
#[derive(Clone, Debug)]
struct ExclusionTracker {
    remaining: Square<CandidateSet>,
    houses: Vec<Vec<Cell>>,
    cell_houses: Square<Vec<usize>>,
    /// house index -> value -> bit per house cell
    positions: VecMap<VecMap<u16>>,
}

impl ExclusionTracker {
    fn new(state: &dyn PuzzleView) -> Self {
        let width = state.width();
        let domain_size = state.domain_size();
        let mut remaining: Square<CandidateSet> = Square::with_width(width);
        for cell in Cell::all(width) {
            if state.value_at(cell).is_none() {
                remaining[cell] = state.candidates_at(cell);
            }
        }
        let houses: Vec<Vec<Cell>> = state.houses().iter().map(|h| h.cells().to_vec()).collect();
        let mut cell_houses: Square<Vec<usize>> = Square::with_width(width);
        for (i, cells) in houses.iter().enumerate() {
            for &cell in cells {
                cell_houses[cell].push(i);
            }
        }
        let mut positions = VecMap::new();
        for (i, house) in state.houses().iter().enumerate() {
            if !house.is_complete(domain_size) {
                continue;
            }
            let mut masks = VecMap::new();
            for value in 1..=domain_size as Value {
                if house.cells().iter().any(|&c| state.value_at(c) == Some(value)) {
                    continue;
                }
                let mask = house
                    .cells()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| remaining[**c].contains(value))
                    .fold(0u16, |mask, (j, _)| mask | 1 << j);
                masks.insert(usize::from(value), mask);
            }
            positions.insert(i, masks);
        }
        Self {
            remaining,
            houses,
            cell_houses,
            positions,
        }
    }

    /// Candidates that cannot hold if `candidate` is placed
    fn excluded_by(&self, candidate: CellCandidate) -> Vec<CellCandidate> {
        let CellCandidate { cell, value } = candidate;
        let mut excluded: Vec<CellCandidate> = self.remaining[cell]
            .iter()
            .filter(|&v| v != value)
            .map(|v| CellCandidate::new(cell, v))
            .collect();
        for &h in &self.cell_houses[cell] {
            for &peer in &self.houses[h] {
                if peer != cell && self.remaining[peer].contains(value) {
                    excluded.push(CellCandidate::new(peer, value));
                }
            }
        }
        excluded
    }

    /// Records `candidate` as impossible and returns the candidates left as
    /// the only option of their cell or house
    fn exclude(&mut self, candidate: CellCandidate) -> Result<Vec<CellCandidate>, ContradictionKind> {
        let CellCandidate { cell, value } = candidate;
        if !self.remaining[cell].remove(value) {
            return Ok(Vec::new());
        }
        let mut forced = Vec::new();
        let left = self.remaining[cell];
        if left.is_empty() {
            return Err(ContradictionKind::EmptyCell(cell));
        }
        if let Some(v) = left.single_value() {
            forced.push(CellCandidate::new(cell, v));
        }
        for &h in &self.cell_houses[cell] {
            let mask = match self.positions.get_mut(h).and_then(|m| m.get_mut(usize::from(value))) {
                Some(mask) => mask,
                None => continue,
            };
            if let Ok(j) = self.houses[h].binary_search(&cell) {
                *mask &= !(1 << j);
            }
            match mask.count_ones() {
                0 => return Err(ContradictionKind::EmptyHouse { house: h, value }),
                1 => forced.push(CellCandidate::new(
                    self.houses[h][mask.trailing_zeros() as usize],
                    value,
                )),
                _ => (),
            }
        }
        Ok(forced)
    }
}

/// A forest of labels over a link graph, grown one seed at a time
pub struct Coloring<'g> {
    graph: &'g LinkGraph<LinkElement>,
    tracker: Option<ExclusionTracker>,
    labels: LinkedAHashMap<LinkElement, ColorEntry>,
}

impl<'g> Coloring<'g> {
    /// Propagates along graph links only
    pub fn new(graph: &'g LinkGraph<LinkElement>) -> Self {
        Self {
            graph,
            tracker: None,
            labels: LinkedAHashMap::default(),
        }
    }

    /// Also propagates along cell and house exclusivity of `state`
    pub fn with_tracker(graph: &'g LinkGraph<LinkElement>, state: &dyn PuzzleView) -> Self {
        Self {
            graph,
            tracker: Some(ExclusionTracker::new(state)),
            labels: LinkedAHashMap::default(),
        }
    }

    /// Labels `seed` and everything it forces. Stops at the first contradiction,
    /// leaving the labels found so far in place.
    pub fn color(&mut self, seed: LinkElement, label: Label) -> ColoringOutcome {
        let mut queue = VecDeque::new();
        let result = self
            .assign(&seed, label, None, None, &mut queue)
            .and_then(|_| self.propagate(&mut queue));
        match result {
            Ok(()) => ColoringOutcome::Consistent,
            Err((kind, trigger)) => {
                trace!("{} {:?} leads to {:?} at {}", seed, label, kind, trigger);
                ColoringOutcome::Contradiction(Contradiction {
                    kind,
                    trigger,
                    seed,
                    seed_label: label,
                })
            }
        }
    }

    fn assign(
        &mut self,
        vertex: &LinkElement,
        label: Label,
        parent: Option<&LinkElement>,
        strength: Option<Strength>,
        queue: &mut VecDeque<LinkElement>,
    ) -> Result<(), Failure> {
        match self.labels.get(vertex) {
            Some(entry) if entry.label == label => Ok(()),
            Some(_) => Err((
                ContradictionKind::Conflict(vertex.clone()),
                parent.unwrap_or(vertex).clone(),
            )),
            None => {
                self.labels.insert(
                    vertex.clone(),
                    ColorEntry {
                        label,
                        parent: parent.cloned(),
                        strength,
                    },
                );
                queue.push_back(vertex.clone());
                Ok(())
            }
        }
    }

    fn propagate(&mut self, queue: &mut VecDeque<LinkElement>) -> Result<(), Failure> {
        let graph = self.graph;
        while let Some(vertex) = queue.pop_front() {
            let label = match self.labels.get(&vertex) {
                Some(entry) => entry.label,
                None => continue,
            };
            match label {
                Label::On => {
                    for neighbor in graph.neighbors(&vertex, StrengthFilter::Weak) {
                        self.assign(neighbor, Label::Off, Some(&vertex), Some(Strength::Weak), queue)?;
                    }
                    let excluded = match (&self.tracker, vertex.candidate()) {
                        (Some(tracker), Some(candidate)) => tracker.excluded_by(candidate),
                        _ => Vec::new(),
                    };
                    for candidate in excluded {
                        self.assign(
                            &LinkElement::Candidate(candidate),
                            Label::Off,
                            Some(&vertex),
                            Some(Strength::Weak),
                            queue,
                        )?;
                    }
                }
                Label::Off => {
                    for neighbor in graph.neighbors(&vertex, StrengthFilter::Strong) {
                        self.assign(neighbor, Label::On, Some(&vertex), Some(Strength::Strong), queue)?;
                    }
                    let forced = match (self.tracker.as_mut(), vertex.candidate()) {
                        (Some(tracker), Some(candidate)) => tracker
                            .exclude(candidate)
                            .map_err(|kind| (kind, vertex.clone()))?,
                        _ => Vec::new(),
                    };
                    for candidate in forced {
                        self.assign(
                            &LinkElement::Candidate(candidate),
                            Label::On,
                            Some(&vertex),
                            Some(Strength::Strong),
                            queue,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn label(&self, vertex: &LinkElement) -> Option<Label> {
        self.labels.get(vertex).map(|e| e.label)
    }

    pub fn entry(&self, vertex: &LinkElement) -> Option<&ColorEntry> {
        self.labels.get(vertex)
    }

    /// The vertices from `vertex` back to the seed that forced it, inclusive
    pub fn path_to_seed(&self, vertex: &LinkElement) -> Vec<LinkElement> {
        let mut path = Vec::new();
        let mut current = self.labels.get(vertex).map(|_| vertex);
        while let Some(v) = current {
            if path.len() > self.labels.len() {
                break;
            }
            path.push(v.clone());
            current = self.labels.get(v).and_then(|e| e.parent.as_ref());
        }
        path
    }

    /// The entries on the way from the seed down to `vertex`, seed first.
    /// Owned, so it outlives the coloring and its graph.
    pub fn trace(&self, vertex: &LinkElement) -> Vec<(LinkElement, ColorEntry)> {
        self.path_to_seed(vertex)
            .into_iter()
            .rev()
            .filter_map(|v| self.entry(&v).cloned().map(|entry| (v, entry)))
            .collect()
    }

    /// Labels in the order they were derived
    pub fn iter(&self) -> impl Iterator<Item = (&LinkElement, &ColorEntry)> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Labels shared by every coloring, in the order of the first. When the
/// colorings start from every alternative of one fact, these labels hold
/// whichever alternative is true.
pub fn agreements(colorings: &[Coloring<'_>]) -> Vec<(LinkElement, Label)> {
    let (first, rest) = match colorings.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };
    first
        .iter()
        .filter(|(v, e)| rest.iter().all(|c| c.label(v) == Some(e.label)))
        .map(|(v, e)| (v.clone(), e.label))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::graph::{
        agreements, BivalueCellRule, Coloring, ColoringOutcome, ConjugatePairRule,
        ContradictionKind, Direction, Label, LinkElement, LinkGraph, PointingSetRule, Strength,
    };
    use crate::puzzle::{CandidateSet, Cell, Grid, MutationSink, PuzzleView};
    use crate::HashSet;

    fn candidate(row: usize, col: usize, value: u8) -> LinkElement {
        LinkElement::candidate_at(Cell::new(row, col), value)
    }

    #[test]
    fn two_seeds_conflict() {
        let s1 = candidate(0, 0, 1);
        let p = candidate(0, 1, 1);
        let s2 = candidate(8, 8, 3);
        let q = candidate(8, 7, 3);
        let x1 = candidate(4, 4, 1);
        let x2 = candidate(4, 4, 2);
        let mut graph = LinkGraph::new();
        graph.add(s1.clone(), p.clone(), Strength::Weak, Direction::Bidirectional);
        graph.add(p.clone(), x1.clone(), Strength::Strong, Direction::MonoDirectional);
        graph.add(s2.clone(), q.clone(), Strength::Weak, Direction::Bidirectional);
        graph.add(q.clone(), x2.clone(), Strength::Strong, Direction::MonoDirectional);
        graph.add(x1.clone(), x2.clone(), Strength::Weak, Direction::Bidirectional);

        let mut coloring = Coloring::new(&graph);
        assert_eq!(ColoringOutcome::Consistent, coloring.color(s1, Label::On));
        assert_eq!(Some(Label::On), coloring.label(&x1));
        assert_eq!(Some(Label::Off), coloring.label(&x2));

        let outcome = coloring.color(s2.clone(), Label::On);
        let contradiction = outcome.contradiction().unwrap();
        assert_eq!(ContradictionKind::Conflict(x2.clone()), contradiction.kind);
        assert_eq!(q, contradiction.trigger);
        assert_eq!((&s2, Label::Off), contradiction.deduction());
        // the earlier label is kept
        assert_eq!(Some(Label::Off), coloring.label(&x2));
    }

    #[test]
    fn self_loops_terminate() {
        let a = candidate(0, 0, 1);
        let b = candidate(0, 1, 1);
        let mut graph = LinkGraph::new();
        graph.add(a.clone(), b.clone(), Strength::Strong, Direction::Bidirectional);
        graph.add(a.clone(), b.clone(), Strength::Weak, Direction::Bidirectional);
        let mut coloring = Coloring::new(&graph);
        assert_eq!(ColoringOutcome::Consistent, coloring.color(a.clone(), Label::Off));
        assert_eq!(2, coloring.len());
        assert_eq!(ColoringOutcome::Consistent, coloring.color(a, Label::Off));
        assert_eq!(2, coloring.len());
    }

    #[test]
    fn tracker_empty_cell() {
        let mut grid = Grid::latin_square(4).unwrap();
        grid.set_candidates(Cell::new(1, 0), CandidateSet::from_values(&[1]));
        let graph = LinkGraph::new();
        let mut coloring = Coloring::with_tracker(&graph, &grid);
        let outcome = coloring.color(candidate(0, 0, 1), Label::On);
        let contradiction = outcome.contradiction().unwrap();
        assert_eq!(ContradictionKind::EmptyCell(Cell::new(1, 0)), contradiction.kind);
        assert_eq!(candidate(1, 0, 1), contradiction.trigger);
    }

    #[test]
    fn tracker_forces_last_position() {
        let mut grid = Grid::latin_square(4).unwrap();
        grid.remove_candidate(Cell::new(1, 2), 2);
        grid.remove_candidate(Cell::new(1, 3), 2);
        let graph = LinkGraph::new();
        let mut coloring = Coloring::with_tracker(&graph, &grid);
        let seed = candidate(0, 0, 2);
        assert_eq!(ColoringOutcome::Consistent, coloring.color(seed.clone(), Label::On));
        let forced = candidate(1, 1, 2);
        let entry = coloring.entry(&forced).unwrap();
        assert_eq!(Label::On, entry.label);
        assert_eq!(Some(candidate(1, 0, 2)), entry.parent);
        assert_eq!(Some(Strength::Strong), entry.strength);
        assert_eq!(
            vec![forced.clone(), candidate(1, 0, 2), seed.clone()],
            coloring.path_to_seed(&forced)
        );
        let trace = coloring.trace(&forced);
        assert_eq!(3, trace.len());
        assert_eq!(seed, trace[0].0);
        assert_eq!(None, trace[0].1.parent);
        assert_eq!(forced, trace[2].0);
        assert_eq!(Some(Strength::Strong), trace[2].1.strength);
    }

    #[test]
    fn tracker_empty_house() {
        // 1 can only go in r1c1 along the first row
        let mut grid = Grid::latin_square(4).unwrap();
        for col in 1..4 {
            grid.remove_candidate(Cell::new(0, col), 1);
        }
        let graph = LinkGraph::new();
        let mut coloring = Coloring::with_tracker(&graph, &grid);
        let outcome = coloring.color(candidate(1, 0, 1), Label::On);
        let contradiction = outcome.contradiction().unwrap();
        assert!(
            matches!(contradiction.kind, ContradictionKind::EmptyHouse { value: 1, .. }),
            "{:?}",
            contradiction.kind
        );
        assert_eq!(candidate(0, 0, 1), contradiction.trigger);
        assert_eq!((&candidate(1, 0, 1), Label::Off), contradiction.deduction());
    }

    #[test]
    fn seed_on_and_off_agree() {
        let a = candidate(0, 0, 1);
        let b = candidate(0, 1, 1);
        let c = candidate(0, 2, 1);
        let mut graph = LinkGraph::new();
        graph.add(a.clone(), b.clone(), Strength::Strong, Direction::Bidirectional);
        graph.add(a.clone(), b.clone(), Strength::Weak, Direction::Bidirectional);
        graph.add(a.clone(), c.clone(), Strength::Weak, Direction::Bidirectional);
        graph.add(b.clone(), c.clone(), Strength::Weak, Direction::Bidirectional);
        let mut on = Coloring::new(&graph);
        on.color(a.clone(), Label::On);
        let mut off = Coloring::new(&graph);
        off.color(a, Label::Off);
        assert_eq!(vec![(c, Label::Off)], agreements(&[on, off]));
    }

    #[test]
    fn transposed_grid_colors_symmetrically() {
        let grid: Grid =
            "003020600900305001001806400008102900700000008006708200002609500800203009005010300"
                .parse()
                .unwrap();
        let transposed = grid.transposed();
        let rules: [&dyn crate::graph::LinkRule; 3] =
            [&BivalueCellRule, &ConjugatePairRule, &PointingSetRule];
        let graph = LinkGraph::build(&grid, &rules);
        let transposed_graph = LinkGraph::build(&transposed, &rules);
        for cell in Cell::all(9).filter(|&c| grid.value_at(c).is_none()) {
            for value in grid.candidates_at(cell).iter() {
                let seed = LinkElement::candidate_at(cell, value);
                let mut coloring = Coloring::with_tracker(&graph, &grid);
                let mut mirrored = Coloring::with_tracker(&transposed_graph, &transposed);
                let outcome = coloring.color(seed.clone(), Label::On);
                let mirrored_outcome = mirrored.color(seed.transposed(), Label::On);
                assert_eq!(outcome.is_contradiction(), mirrored_outcome.is_contradiction());
                if !outcome.is_contradiction() {
                    let labels: HashSet<_> =
                        coloring.iter().map(|(v, e)| (v.transposed(), e.label)).collect();
                    let mirrored_labels: HashSet<_> =
                        mirrored.iter().map(|(v, e)| (v.clone(), e.label)).collect();
                    assert_eq!(labels, mirrored_labels);
                }
            }
        }
    }
}
