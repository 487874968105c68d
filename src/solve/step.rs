use std::fmt;
use std::slice;
use std::sync::Arc;

use itertools::Itertools;

use crate::solve::{Change, Report};

/// The record of one applied commit
#[derive(Clone)]
pub struct Step<P> {
    /// Name of the strategy that made the deduction
    pub strategy: &'static str,
    /// The changes that took effect, placements first
    pub changes: Vec<Change>,
    /// State before the push. Steps from the same push share it.
    pub before: Arc<P>,
    pub after: P,
    pub report: Report,
}

impl<P> fmt::Display for Step<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.changes.iter().join(", "))?;
        if !self.report.explanation.is_empty() {
            write!(f, " ({})", self.report.explanation)?;
        }
        Ok(())
    }
}

/// Append-only history of applied steps
pub struct StepLog<P> {
    steps: Vec<Step<P>>,
}

impl<P> Default for StepLog<P> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<P> StepLog<P> {
    pub fn push(&mut self, step: Step<P>) {
        self.steps.push(step);
    }

    pub fn iter(&self) -> slice::Iter<'_, Step<P>> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step<P>> {
        self.steps.last()
    }

    pub fn get(&self, index: usize) -> Option<&Step<P>> {
        self.steps.get(index)
    }

    pub(crate) fn clear(&mut self) {
        self.steps.clear();
    }
}

impl<'a, P> IntoIterator for &'a StepLog<P> {
    type Item = &'a Step<P>;
    type IntoIter = slice::Iter<'a, Step<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
