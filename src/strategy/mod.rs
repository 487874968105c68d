//! Deduction strategies
//!
//! A strategy inspects the puzzle through a [`PuzzleView`] and proposes
//! changes to a [`ChangeBuffer`]. It never mutates the puzzle; the solver
//! pushes its commits according to [`Strategy::commit_policy`].

pub use self::chains::{AlsChain, AlternatingChain};
pub use self::forcing::{CandidateForcingNet, CellForcingNet, NishioForcingNet};
pub use self::locked_candidates::LockedCandidates;
pub use self::loops::ContinuousLoop;
pub use self::naked_subset::NakedSubset;
pub use self::singles::{HiddenSingle, NakedSingle};

mod chains;
mod forcing;
mod locked_candidates;
mod loops;
mod naked_subset;
mod singles;

use enum_dispatch::enum_dispatch;
use itertools::Itertools;

use crate::puzzle::{Cell, PuzzleView};
use crate::solve::{ChangeBuffer, CommitPolicy};

#[enum_dispatch]
pub trait Strategy: Send {
    fn name(&self) -> &'static str;

    /// Strategies are tried in ascending difficulty
    fn difficulty(&self) -> u32;

    fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::Return
    }

    /// Searches the current state and proposes what it finds
    fn apply(&self, state: &dyn PuzzleView, buffer: &mut ChangeBuffer<'_>);
}

/// Every strategy that ships with the crate
#[enum_dispatch(Strategy)]
#[derive(Clone, Debug)]
pub enum BuiltinStrategy {
    NakedSingle,
    HiddenSingle,
    LockedCandidates,
    NakedSubset,
    AlternatingChain,
    ContinuousLoop,
    AlsChain,
    NishioForcingNet,
    CellForcingNet,
    CandidateForcingNet,
}

/// The built-in strategies, easiest first
pub fn builtin_strategies() -> Vec<BuiltinStrategy> {
    vec![
        NakedSingle.into(),
        HiddenSingle.into(),
        LockedCandidates.into(),
        NakedSubset::default().into(),
        AlternatingChain::default().into(),
        ContinuousLoop::default().into(),
        AlsChain::default().into(),
        NishioForcingNet.into(),
        CellForcingNet::default().into(),
        CandidateForcingNet.into(),
    ]
}

pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    builtin_strategies()
        .into_iter()
        .map(|s| -> Box<dyn Strategy> { Box::new(s) })
        .collect()
}

fn unsolved_cells(state: &dyn PuzzleView) -> impl Iterator<Item = Cell> + '_ {
    Cell::all(state.width()).filter(move |&c| state.value_at(c).is_none())
}

fn join_cells(cells: &[Cell]) -> String {
    cells.iter().join(", ")
}
