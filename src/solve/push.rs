use std::cmp::Ordering;
use std::sync::Arc;

use crate::puzzle::Puzzle;
use crate::solve::{Commit, Report, Step};

/// Orders two commits; the greater one is better
pub type CommitComparator = fn(&Commit, &Commit) -> Ordering;

/// Decides which of the commits accumulated by one strategy invocation are applied
#[derive(Clone, Copy, Debug)]
pub enum CommitPolicy {
    /// Apply the first commit only
    Return,
    /// Apply every commit, in order, skipping changes that earlier commits made moot
    WaitForAll,
    /// Apply the single best commit. Uses [`default_comparator`] when no comparator is given.
    ChooseBest(Option<CommitComparator>),
}

impl Default for CommitPolicy {
    fn default() -> Self {
        CommitPolicy::Return
    }
}

/// Placements weigh 3, removals weigh 1; the heavier commit wins
pub fn default_comparator(a: &Commit, b: &Commit) -> Ordering {
    a.weight().cmp(&b.weight())
}

/// The commits of one strategy invocation, waiting to be pushed
#[derive(Debug, Default)]
pub struct PendingCommits {
    commits: Vec<Commit>,
}

impl PendingCommits {
    pub(crate) fn new(commits: Vec<Commit>) -> Self {
        Self { commits }
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Resolves the commits according to `policy` and applies the chosen ones to
    /// `puzzle`. Returns one step per commit that changed something.
    ///
    /// Every report is built against one snapshot taken before the first
    /// mutation, and only for commits that were applied.
    pub fn push<P: Puzzle>(
        self,
        strategy: &'static str,
        policy: CommitPolicy,
        puzzle: &mut P,
    ) -> Vec<Step<P>> {
        if self.commits.is_empty() {
            return Vec::new();
        }
        let seen = self.commits.len();
        let chosen = match policy {
            CommitPolicy::Return => self.commits.into_iter().take(1).collect(),
            CommitPolicy::WaitForAll => self.commits,
            CommitPolicy::ChooseBest(comparator) => {
                let comparator = comparator.unwrap_or(default_comparator);
                select_best(self.commits, comparator).into_iter().collect()
            }
        };
        let snapshot = Arc::new(puzzle.clone());
        let mut steps = Vec::new();
        for commit in chosen {
            let (changes, builder) = commit.into_parts();
            let mut applied = Vec::with_capacity(changes.len());
            for change in changes {
                if change.is_effective(&*puzzle) {
                    change.apply(puzzle);
                    applied.push(change);
                }
            }
            if applied.is_empty() {
                debug!("{}: commit no longer has any effect, skipping", strategy);
                continue;
            }
            let report = builder.build(&applied, &*snapshot).unwrap_or_else(|e| {
                warn!("{}: failed to build report: {:#}", strategy, e);
                Report::default()
            });
            info!(
                "{}: applied {} change(s): {}",
                strategy,
                applied.len(),
                report.explanation
            );
            steps.push(Step {
                strategy,
                changes: applied,
                before: Arc::clone(&snapshot),
                after: puzzle.clone(),
                report,
            });
        }
        debug!(
            "{}: pushed with {:?}, {} commit(s) seen, {} applied",
            strategy,
            policy,
            seen,
            steps.len()
        );
        steps
    }
}

/// Keeps the first of equally good commits
fn select_best(commits: Vec<Commit>, comparator: CommitComparator) -> Option<Commit> {
    let mut best: Option<Commit> = None;
    for commit in commits {
        best = match best {
            Some(b) if comparator(&commit, &b) != Ordering::Greater => Some(b),
            _ => Some(commit),
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use std::cmp;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::puzzle::{Cell, CellCandidate, Grid, PuzzleView};
    use crate::solve::{ChangeBuffer, Commit, CommitPolicy, Report};

    fn candidate(row: usize, col: usize, value: u8) -> CellCandidate {
        CellCandidate::new(Cell::new(row, col), value)
    }

    /// Three commits weighing 1, 3 and 2
    fn scored_buffer(grid: &Grid) -> ChangeBuffer<'_> {
        let mut buffer = ChangeBuffer::new(grid);
        buffer.propose_removal(candidate(0, 0, 1));
        buffer.commit(|_, _| Ok(Report::new("one", Vec::new())));
        buffer.propose_removal(candidate(4, 4, 1));
        buffer.propose_removal(candidate(4, 4, 2));
        buffer.propose_removal(candidate(4, 4, 3));
        buffer.commit(|_, _| Ok(Report::new("three", Vec::new())));
        buffer.propose_removal(candidate(8, 8, 1));
        buffer.propose_removal(candidate(8, 8, 2));
        buffer.commit(|_, _| Ok(Report::new("two", Vec::new())));
        buffer
    }

    fn explanations(policy: CommitPolicy) -> Vec<String> {
        let mut grid = Grid::sudoku(3, 3).unwrap();
        let snapshot = grid.clone();
        let pending = scored_buffer(&snapshot).into_pending();
        pending
            .push("test", policy, &mut grid)
            .into_iter()
            .map(|step| step.report.explanation)
            .collect()
    }

    #[test]
    fn return_applies_first() {
        assert_eq!(vec!["one"], explanations(CommitPolicy::Return));
    }

    #[test]
    fn choose_best_applies_heaviest() {
        assert_eq!(vec!["three"], explanations(CommitPolicy::ChooseBest(None)));
    }

    #[test]
    fn choose_best_with_comparator() {
        fn lightest(a: &Commit, b: &Commit) -> cmp::Ordering {
            b.weight().cmp(&a.weight())
        }
        assert_eq!(
            vec!["one"],
            explanations(CommitPolicy::ChooseBest(Some(lightest)))
        );
    }

    #[test]
    fn wait_for_all_applies_every_commit() {
        assert_eq!(
            vec!["one", "three", "two"],
            explanations(CommitPolicy::WaitForAll)
        );
    }

    #[test]
    fn moot_commits_are_skipped() {
        let mut grid = Grid::sudoku(3, 3).unwrap();
        let snapshot = grid.clone();
        let mut buffer = ChangeBuffer::new(&snapshot);
        buffer.propose_placement(candidate(0, 0, 1));
        buffer.commit(|_, _| Ok(Report::default()));
        // placing 1 at r1c1 already removes 1 from r1c2
        buffer.propose_removal(candidate(0, 1, 1));
        buffer.commit(|_, _| Ok(Report::default()));
        let steps = buffer
            .into_pending()
            .push("test", CommitPolicy::WaitForAll, &mut grid);
        assert_eq!(1, steps.len());
        assert_eq!(Some(1), grid.value_at(Cell::new(0, 0)));
        assert!(!grid.candidates_at(Cell::new(0, 1)).contains(1));
    }

    #[test]
    fn reports_see_state_before_mutation() {
        let mut grid = Grid::sudoku(3, 3).unwrap();
        let snapshot = grid.clone();
        let mut buffer = ChangeBuffer::new(&snapshot);
        buffer.propose_placement(candidate(2, 2, 7));
        buffer.commit(|changes, state| {
            assert_eq!(1, changes.len());
            assert_eq!(None, state.value_at(Cell::new(2, 2)));
            Ok(Report::default())
        });
        let steps = buffer
            .into_pending()
            .push("test", CommitPolicy::Return, &mut grid);
        assert_eq!(None, steps[0].before.value_at(Cell::new(2, 2)));
        assert_eq!(Some(7), steps[0].after.value_at(Cell::new(2, 2)));
    }

    #[test]
    fn failed_report_keeps_change() {
        let mut grid = Grid::sudoku(3, 3).unwrap();
        let snapshot = grid.clone();
        let mut buffer = ChangeBuffer::new(&snapshot);
        buffer.propose_removal(candidate(3, 3, 3));
        buffer.commit(|_, _| Err(anyhow::anyhow!("no explanation")));
        let steps = buffer
            .into_pending()
            .push("test", CommitPolicy::Return, &mut grid);
        assert_eq!(1, steps.len());
        assert_eq!(Report::default(), steps[0].report);
        assert!(!grid.candidates_at(Cell::new(3, 3)).contains(3));
    }

    #[test]
    fn discarded_builders_never_run() {
        let built = Arc::new(AtomicUsize::new(0));
        let mut grid = Grid::sudoku(3, 3).unwrap();
        let snapshot = grid.clone();
        let mut buffer = ChangeBuffer::new(&snapshot);
        buffer.propose_removal(candidate(0, 0, 1));
        buffer.commit(|_, _| Ok(Report::default()));
        buffer.propose_removal(candidate(0, 0, 2));
        let counter = Arc::clone(&built);
        buffer.commit(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Report::default())
        });
        let steps = buffer
            .into_pending()
            .push("test", CommitPolicy::Return, &mut grid);
        assert_eq!(1, steps.len());
        assert_eq!(0, built.load(Ordering::SeqCst));
        assert!(grid.candidates_at(Cell::new(0, 0)).contains(2));
    }

    #[test]
    fn empty_push_is_a_no_op() {
        let mut grid = Grid::sudoku(3, 3).unwrap();
        let snapshot = grid.clone();
        let pending = ChangeBuffer::new(&snapshot).into_pending();
        assert!(pending.is_empty());
        assert!(pending
            .push("test", CommitPolicy::WaitForAll, &mut grid)
            .is_empty());
    }
}
