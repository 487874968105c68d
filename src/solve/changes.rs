use std::fmt;
use std::mem;

use crate::collections::LinkedAHashSet;
use crate::puzzle::{CellCandidate, MutationSink, PuzzleView};
use crate::solve::push::PendingCommits;
use crate::solve::report::{Report, ReportBuilder};

/// A deduction waiting to be applied to the puzzle
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// Set the cell to the value
    Placement(CellCandidate),
    /// Remove the value from the cell's candidates
    Removal(CellCandidate),
}

impl Change {
    pub fn candidate(self) -> CellCandidate {
        match self {
            Change::Placement(c) | Change::Removal(c) => c,
        }
    }

    pub fn is_placement(self) -> bool {
        matches!(self, Change::Placement(_))
    }

    /// Placements count for more than removals when commits compete
    pub fn weight(self) -> u32 {
        match self {
            Change::Placement(_) => 3,
            Change::Removal(_) => 1,
        }
    }

    /// True if applying the change would still alter `state`
    pub fn is_effective(self, state: &dyn PuzzleView) -> bool {
        state.has_candidate(self.candidate())
    }

    pub(crate) fn apply<S: MutationSink + ?Sized>(self, sink: &mut S) {
        match self {
            Change::Placement(c) => sink.set_value(c.cell, c.value),
            Change::Removal(c) => sink.remove_candidate(c.cell, c.value),
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Placement(c) => write!(f, "{}={}", c.cell, c.value),
            Change::Removal(c) => write!(f, "{}<>{}", c.cell, c.value),
        }
    }
}

impl fmt::Debug for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A fixed batch of changes, and the deferred builder of its report
pub struct Commit {
    changes: Vec<Change>,
    rank: usize,
    builder: Box<dyn ReportBuilder>,
}

impl Commit {
    /// Placements first, then removals
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Strategy-defined complexity of the deduction, lower is simpler
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn weight(&self) -> u32 {
        self.changes.iter().map(|c| c.weight()).sum()
    }

    pub(crate) fn into_parts(self) -> (Vec<Change>, Box<dyn ReportBuilder>) {
        (self.changes, self.builder)
    }
}

impl fmt::Debug for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit")
            .field("changes", &self.changes)
            .field("rank", &self.rank)
            .finish()
    }
}

/// Collects the deductions of one strategy invocation. Nothing reaches the
/// puzzle until the pending commits are pushed.
pub struct ChangeBuffer<'a> {
    state: &'a dyn PuzzleView,
    placements: LinkedAHashSet<CellCandidate>,
    removals: LinkedAHashSet<CellCandidate>,
    commits: Vec<Commit>,
}

impl<'a> ChangeBuffer<'a> {
    pub fn new(state: &'a dyn PuzzleView) -> Self {
        Self {
            state,
            placements: LinkedAHashSet::default(),
            removals: LinkedAHashSet::default(),
            commits: Vec::new(),
        }
    }

    /// Proposes removing a candidate. Ignored if the cell no longer has it.
    pub fn propose_removal(&mut self, candidate: CellCandidate) {
        if self.state.has_candidate(candidate) {
            self.removals.insert(candidate);
        }
    }

    /// Proposes placing a candidate. Ignored if the cell is solved or lacks the candidate.
    pub fn propose_placement(&mut self, candidate: CellCandidate) {
        if self.state.has_candidate(candidate) {
            self.placements.insert(candidate);
        }
    }

    /// True if there are uncommitted proposals
    pub fn not_empty(&self) -> bool {
        !self.placements.is_empty() || !self.removals.is_empty()
    }

    /// Drops uncommitted proposals
    pub fn discard(&mut self) {
        self.placements.clear();
        self.removals.clear();
    }

    /// Packages the uncommitted proposals into a commit. Returns false if there
    /// was nothing to commit.
    pub fn commit<F>(&mut self, builder: F) -> bool
    where
        F: FnOnce(&[Change], &dyn PuzzleView) -> anyhow::Result<Report> + Send + 'static,
    {
        self.commit_ranked(0, builder)
    }

    /// Like `commit`, recording how complex the deduction is
    pub fn commit_ranked<F>(&mut self, rank: usize, builder: F) -> bool
    where
        F: FnOnce(&[Change], &dyn PuzzleView) -> anyhow::Result<Report> + Send + 'static,
    {
        self.commit_builder(rank, Box::new(builder))
    }

    pub fn commit_builder(&mut self, rank: usize, builder: Box<dyn ReportBuilder>) -> bool {
        if !self.not_empty() {
            return false;
        }
        let changes = mem::take(&mut self.placements)
            .into_iter()
            .map(Change::Placement)
            .chain(mem::take(&mut self.removals).into_iter().map(Change::Removal))
            .collect();
        self.commits.push(Commit {
            changes,
            rank,
            builder,
        });
        true
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Ends the invocation. Uncommitted proposals are dropped.
    pub fn into_pending(self) -> PendingCommits {
        PendingCommits::new(self.commits)
    }
}
