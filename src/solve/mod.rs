//! Apply strategies to a puzzle until it is solved or nothing more can be deduced

pub use self::changes::{Change, ChangeBuffer, Commit};
pub use self::consistency::{check_consistency, Consistency, Inconsistency};
pub use self::push::{default_comparator, CommitComparator, CommitPolicy, PendingCommits};
pub use self::report::{Highlight, HighlightColor, HighlightCompiler, Report, ReportBuilder};
pub use self::step::{Step, StepLog};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};

use crate::puzzle::Puzzle;
use crate::solve::step_writer::StepWriter;
use crate::strategy::{default_strategies, Strategy};

mod changes;
mod consistency;
mod push;
mod report;
mod step;
mod step_writer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverState {
    /// A puzzle is loaded and has not been solved yet
    Idle,
    Running,
    Solved,
    /// The puzzle has no solution
    Contradiction,
    /// A full pass over the strategies made no progress
    Stalled,
    Cancelled,
}

impl SolverState {
    /// True if solving the loaded puzzle has ended
    pub fn is_terminal(self) -> bool {
        !matches!(self, SolverState::Idle | SolverState::Running)
    }
}

/// Emitted once for every applied step. Read the new state from the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress;

/// Cooperative cancellation, checked between strategy invocations
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Solver<P: Puzzle> {
    puzzle: P,
    strategies: Vec<Box<dyn Strategy>>,
    max_difficulty: Option<u32>,
    history: StepLog<P>,
    state: SolverState,
    cancel: CancelFlag,
    step_writer: Option<StepWriter>,
}

impl<P: Puzzle> Solver<P> {
    /// A solver using every built-in strategy
    pub fn new(puzzle: P) -> Self {
        let mut solver = Self {
            puzzle,
            strategies: Vec::new(),
            max_difficulty: None,
            history: StepLog::default(),
            state: SolverState::Idle,
            cancel: CancelFlag::new(),
            step_writer: None,
        };
        solver.strategies(default_strategies());
        solver
    }

    /// Replaces the strategies. They are tried easiest first.
    pub fn strategies(&mut self, mut strategies: Vec<Box<dyn Strategy>>) -> &mut Self {
        strategies.sort_by_key(|s| s.difficulty());
        self.strategies = strategies;
        self
    }

    /// Skips strategies harder than `max`
    pub fn max_difficulty(&mut self, max: Option<u32>) -> &mut Self {
        self.max_difficulty = max;
        self
    }

    pub fn save_steps(&mut self, path: &Path) -> &mut Self {
        self.step_writer = Some(StepWriter::new(path.into()));
        self
    }

    /// A handle that cancels this solver from anywhere
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn puzzle(&self) -> &P {
        &self.puzzle
    }

    pub fn into_puzzle(self) -> P {
        self.puzzle
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn history(&self) -> &StepLog<P> {
        &self.history
    }

    /// Replaces the puzzle and starts over
    pub fn load(&mut self, puzzle: P) {
        self.puzzle = puzzle;
        self.history.clear();
        self.cancel.reset();
        self.set_state(SolverState::Idle);
    }

    /// Tries strategies in order until one of them makes progress. Returns the
    /// number of steps applied.
    pub fn run_pass(&mut self) -> Result<usize> {
        self.pass(&mut |_| {})
    }

    fn pass(&mut self, progress: &mut dyn FnMut(Progress)) -> Result<usize> {
        for strategy in &self.strategies {
            if self.cancel.is_cancelled() {
                return Ok(0);
            }
            if let Some(max) = self.max_difficulty {
                if strategy.difficulty() > max {
                    continue;
                }
            }
            let pending = {
                let mut buffer = ChangeBuffer::new(&self.puzzle);
                strategy.apply(&self.puzzle, &mut buffer);
                buffer.into_pending()
            };
            if pending.is_empty() {
                continue;
            }
            debug!("{} found {} commit(s)", strategy.name(), pending.len());
            let steps = pending.push(strategy.name(), strategy.commit_policy(), &mut self.puzzle);
            if steps.is_empty() {
                continue;
            }
            let count = steps.len();
            for step in steps {
                if let Some(writer) = self.step_writer.as_mut() {
                    writer.write_step(&step)?;
                }
                self.history.push(step);
                progress(Progress);
            }
            return Ok(count);
        }
        Ok(0)
    }

    /// Runs passes until the puzzle is solved, found contradictory, stalled or
    /// cancelled. A solver in a terminal state returns it right away.
    pub fn solve_with_progress(&mut self, mut progress: impl FnMut(Progress)) -> Result<SolverState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        self.set_state(SolverState::Running);
        loop {
            match check_consistency(&self.puzzle) {
                Consistency::Solved => {
                    self.set_state(SolverState::Solved);
                    break;
                }
                Consistency::Contradiction(reason) => {
                    info!("contradiction: {}", reason);
                    self.set_state(SolverState::Contradiction);
                    break;
                }
                Consistency::Consistent => {}
            }
            if self.cancel.is_cancelled() {
                self.set_state(SolverState::Cancelled);
                break;
            }
            if self.pass(&mut progress)? == 0 {
                let state = if self.cancel.is_cancelled() {
                    SolverState::Cancelled
                } else {
                    SolverState::Stalled
                };
                self.set_state(state);
                break;
            }
        }
        Ok(self.state)
    }

    pub fn solve(&mut self) -> Result<SolverState> {
        self.solve_with_progress(|_| {})
    }

    fn set_state(&mut self, state: SolverState) {
        if self.state != state {
            info!("solver state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

impl<P> Solver<P>
where
    P: Puzzle + Send + Sync + 'static,
{
    /// Solves on a background thread
    pub fn spawn(mut self) -> SolveHandle<P> {
        let (sender, progress) = mpsc::channel();
        let cancel = self.cancel_flag();
        let thread = thread::spawn(move || -> Result<Solver<P>> {
            self.solve_with_progress(|p| {
                // the receiver may have stopped listening
                let _ = sender.send(p);
            })?;
            Ok(self)
        });
        SolveHandle {
            progress,
            cancel,
            thread,
        }
    }
}

/// A solve running on a background thread
pub struct SolveHandle<P: Puzzle> {
    progress: Receiver<Progress>,
    cancel: CancelFlag,
    thread: JoinHandle<Result<Solver<P>>>,
}

impl<P: Puzzle> SolveHandle<P> {
    /// One event per applied step
    pub fn progress(&self) -> &Receiver<Progress> {
        &self.progress
    }

    /// Stops the solve before its next strategy invocation
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the solve to end and returns the solver
    pub fn join(self) -> Result<Solver<P>> {
        self.thread
            .join()
            .map_err(|_| anyhow!("solver thread panicked"))?
    }
}
