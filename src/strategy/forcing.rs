//! Forcing nets: assume something, follow the consequences, and keep what
//! holds no matter which assumption is true

use itertools::Itertools;

use crate::graph::{
    agreements, BivalueCellRule, ColorEntry, Coloring, ConjugatePairRule, Label, LinkElement,
    LinkGraph, PointingSetRule,
};
use crate::puzzle::{CellCandidate, PuzzleView};
use crate::solve::{ChangeBuffer, CommitPolicy, HighlightColor, HighlightCompiler, Report};
use crate::strategy::{unsolved_cells, Strategy};

/// Assumes each candidate in turn. A candidate whose consequences contradict
/// each other is false.
#[derive(Clone, Copy, Debug, Default)]
pub struct NishioForcingNet;

/// Assumes each candidate of a cell in turn. Whatever follows from all of
/// them holds.
#[derive(Clone, Copy, Debug)]
pub struct CellForcingNet {
    max_candidates: usize,
}

impl CellForcingNet {
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }
}

impl Default for CellForcingNet {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Assumes a candidate both true and false. Whatever follows from both holds.
#[derive(Clone, Copy, Debug, Default)]
pub struct CandidateForcingNet;

fn build_graph(state: &dyn PuzzleView) -> LinkGraph<LinkElement> {
    LinkGraph::build(
        state,
        &[&BivalueCellRule, &ConjugatePairRule, &PointingSetRule],
    )
}

fn candidates(state: &dyn PuzzleView) -> impl Iterator<Item = CellCandidate> + '_ {
    unsolved_cells(state).flat_map(move |cell| {
        state
            .candidates_at(cell)
            .iter()
            .map(move |value| CellCandidate::new(cell, value))
    })
}

/// Proposes every candidate fact the colorings agree on and commits them
fn commit_agreements(
    colorings: &[Coloring<'_>],
    buffer: &mut ChangeBuffer<'_>,
    rank: usize,
    premise: String,
) -> bool {
    let agreed: Vec<(CellCandidate, Label)> = agreements(colorings)
        .into_iter()
        .filter_map(|(v, label)| v.candidate().map(|c| (c, label)))
        .collect();
    for &(candidate, label) in &agreed {
        match label {
            Label::On => buffer.propose_placement(candidate),
            Label::Off => buffer.propose_removal(candidate),
        }
    }
    // traced now, the colorings borrow the graph
    let traces: Vec<Vec<(LinkElement, ColorEntry)>> = colorings
        .iter()
        .flat_map(|coloring| {
            agreed
                .iter()
                .map(move |&(c, _)| coloring.trace(&LinkElement::Candidate(c)))
        })
        .collect();
    buffer.commit_ranked(rank, move |changes, _| {
        let mut compiler = HighlightCompiler::new();
        for trace in &traces {
            compiler.coloring_trace(trace);
        }
        let highlights = compiler.changes(changes).finish();
        Ok(Report::new(
            format!("{}, {}", premise, changes.iter().join(", ")),
            highlights,
        ))
    })
}

impl Strategy for NishioForcingNet {
    fn name(&self) -> &'static str {
        "Nishio Forcing Net"
    }

    fn difficulty(&self) -> u32 {
        9
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::WaitForAll
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        let graph = build_graph(state);
        for candidate in candidates(state) {
            let seed = LinkElement::Candidate(candidate);
            let mut coloring = Coloring::with_tracker(&graph, state);
            let outcome = coloring.color(seed.clone(), Label::On);
            let contradiction = match outcome.contradiction() {
                Some(contradiction) => contradiction.clone(),
                None => continue,
            };
            debug!("{} leads to {:?}", candidate, contradiction.kind);
            let trace = coloring.trace(&contradiction.trigger);
            buffer.propose_removal(candidate);
            buffer.commit_ranked(trace.len(), move |changes, _| {
                let mut compiler = HighlightCompiler::new();
                compiler
                    .candidate(candidate, HighlightColor::Focus)
                    .coloring_trace(&trace);
                let highlights = compiler.changes(changes).finish();
                Ok(Report::new(
                    format!(
                        "if {} were true, {:?} at {}",
                        candidate, contradiction.kind, contradiction.trigger
                    ),
                    highlights,
                ))
            });
        }
    }
}

impl Strategy for CellForcingNet {
    fn name(&self) -> &'static str {
        "Cell Forcing Net"
    }

    fn difficulty(&self) -> u32 {
        10
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::ChooseBest(None)
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        let graph = build_graph(state);
        for cell in unsolved_cells(state) {
            let values = state.candidates_at(cell);
            if values.len() < 2 || values.len() > self.max_candidates {
                continue;
            }
            let mut colorings = Vec::with_capacity(values.len());
            for value in values {
                let mut coloring = Coloring::with_tracker(&graph, state);
                if coloring
                    .color(LinkElement::candidate_at(cell, value), Label::On)
                    .is_contradiction()
                {
                    break;
                }
                colorings.push(coloring);
            }
            if colorings.len() < values.len() {
                continue;
            }
            commit_agreements(
                &colorings,
                buffer,
                values.len(),
                format!("whichever value {} takes", cell),
            );
        }
    }
}

impl Strategy for CandidateForcingNet {
    fn name(&self) -> &'static str {
        "Candidate Forcing Net"
    }

    fn difficulty(&self) -> u32 {
        11
    }

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::ChooseBest(None)
    }

    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>) {
        let graph = build_graph(state);
        for candidate in candidates(state) {
            let seed = LinkElement::Candidate(candidate);
            let mut on = Coloring::with_tracker(&graph, state);
            let mut off = Coloring::with_tracker(&graph, state);
            if on.color(seed.clone(), Label::On).is_contradiction()
                || off.color(seed, Label::Off).is_contradiction()
            {
                continue;
            }
            commit_agreements(
                &[on, off],
                buffer,
                2,
                format!("whether or not {} is true", candidate),
            );
        }
    }
}
