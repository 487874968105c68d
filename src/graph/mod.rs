//! Strong and weak links between candidate assignments
//!
//! A [`LinkGraph`] is built fresh for every strategy invocation from the
//! current candidates using [`LinkRule`]s, then searched with the
//! [`Chain`] builder or the [`Coloring`] engine.

pub use self::chain::{Chain, Loop};
pub use self::coloring::{
    agreements, ColorEntry, Coloring, ColoringOutcome, Contradiction, ContradictionKind, Label,
};
pub use self::element::LinkElement;
pub use self::rules::{
    AlmostLockedSetRule, BivalueCellRule, CellWeakRule, ConjugatePairRule, HouseWeakRule,
    LinkRule, PointingSetRule,
};
pub(crate) use self::rules::positions;

mod chain;
mod coloring;
mod element;
mod rules;

use std::fmt::Debug;
use std::hash::Hash;

use crate::collections::{LinkedAHashMap, LinkedAHashSet};
use crate::puzzle::{CellCandidate, PuzzleView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strength {
    /// If one side is false, the other is true
    Strong,
    /// If one side is true, the other is false
    Weak,
}

impl Strength {
    pub fn opposite(self) -> Self {
        match self {
            Strength::Strong => Strength::Weak,
            Strength::Weak => Strength::Strong,
        }
    }
}

/// Selects links by strength when querying a graph
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrengthFilter {
    Strong,
    Weak,
    Any,
}

impl StrengthFilter {
    fn includes(self, strength: Strength) -> bool {
        match self {
            StrengthFilter::Any => true,
            StrengthFilter::Strong => strength == Strength::Strong,
            StrengthFilter::Weak => strength == Strength::Weak,
        }
    }
}

impl From<Strength> for StrengthFilter {
    fn from(strength: Strength) -> Self {
        match strength {
            Strength::Strong => StrengthFilter::Strong,
            Strength::Weak => StrengthFilter::Weak,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Bidirectional,
    /// Only `from -> to` is recorded
    MonoDirectional,
}

/// Vertices that carry a search cost
pub trait Rank {
    fn rank(&self) -> usize;
}

impl Rank for CellCandidate {
    fn rank(&self) -> usize {
        0
    }
}

#[derive(Debug)]
struct Adjacency<V: Hash + Eq> {
    strong: LinkedAHashSet<V>,
    weak: LinkedAHashSet<V>,
}

impl<V: Hash + Eq> Default for Adjacency<V> {
    fn default() -> Self {
        Self {
            strong: LinkedAHashSet::default(),
            weak: LinkedAHashSet::default(),
        }
    }
}

impl<V: Hash + Eq> Adjacency<V> {
    fn links(&self, strength: Strength) -> &LinkedAHashSet<V> {
        match strength {
            Strength::Strong => &self.strong,
            Strength::Weak => &self.weak,
        }
    }

    fn links_mut(&mut self, strength: Strength) -> &mut LinkedAHashSet<V> {
        match strength {
            Strength::Strong => &mut self.strong,
            Strength::Weak => &mut self.weak,
        }
    }
}

/// Directed adjacency lists of strong and weak links. Vertices and links are
/// kept in insertion order so searches over the graph are deterministic.
#[derive(Debug)]
pub struct LinkGraph<V: Hash + Eq> {
    adjacency: LinkedAHashMap<V, Adjacency<V>>,
}

impl<V: Hash + Eq> Default for LinkGraph<V> {
    fn default() -> Self {
        Self {
            adjacency: LinkedAHashMap::default(),
        }
    }
}

impl<V> LinkGraph<V>
where
    V: Clone + Hash + Eq + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link. Returns true if any direction of it was not already present.
    /// Links from a vertex to itself are ignored.
    pub fn add(&mut self, from: V, to: V, strength: Strength, direction: Direction) -> bool {
        if from == to {
            return false;
        }
        let mut added = self.insert(from.clone(), to.clone(), strength);
        match direction {
            Direction::Bidirectional => added |= self.insert(to, from, strength),
            Direction::MonoDirectional => self.touch(to),
        }
        added
    }

    fn insert(&mut self, from: V, to: V, strength: Strength) -> bool {
        self.touch(to.clone());
        self.adjacency
            .entry(from)
            .or_insert_with(Adjacency::default)
            .links_mut(strength)
            .insert(to)
    }

    fn touch(&mut self, vertex: V) {
        self.adjacency
            .entry(vertex)
            .or_insert_with(Adjacency::default);
    }

    /// Lazily enumerates the vertices linked from `vertex`. With
    /// `StrengthFilter::Any`, strong neighbors come first and a vertex linked
    /// both ways is yielded once.
    pub fn neighbors<'a>(
        &'a self,
        vertex: &V,
        filter: StrengthFilter,
    ) -> impl Iterator<Item = &'a V> + 'a {
        let adjacency = self.adjacency.get(vertex);
        let strong = adjacency
            .filter(move |_| filter.includes(Strength::Strong))
            .into_iter()
            .flat_map(|a| a.strong.iter());
        let weak = adjacency
            .filter(move |_| filter.includes(Strength::Weak))
            .into_iter()
            .flat_map(move |a| {
                a.weak
                    .iter()
                    .filter(move |v| filter != StrengthFilter::Any || !a.strong.contains(*v))
            });
        strong.chain(weak)
    }

    pub fn are_neighbors(&self, a: &V, b: &V, filter: StrengthFilter) -> bool {
        match self.adjacency.get(a) {
            None => false,
            Some(adjacency) => {
                (filter.includes(Strength::Strong) && adjacency.strong.contains(b))
                    || (filter.includes(Strength::Weak) && adjacency.weak.contains(b))
            }
        }
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of directed links of a strength
    pub fn link_count(&self, strength: Strength) -> usize {
        self.adjacency
            .values()
            .map(|a| a.links(strength).len())
            .sum()
    }
}

impl LinkGraph<LinkElement> {
    /// Runs each rule in turn over the current state
    pub fn build(state: &dyn PuzzleView, rules: &[&dyn LinkRule]) -> Self {
        let mut graph = Self::new();
        for rule in rules {
            rule.add_links(state, &mut graph);
        }
        debug!(
            "built link graph: {} vertices, {} strong, {} weak",
            graph.vertex_count(),
            graph.link_count(Strength::Strong),
            graph.link_count(Strength::Weak),
        );
        graph
    }
}
