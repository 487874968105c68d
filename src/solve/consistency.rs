use std::fmt;

use crate::puzzle::{Cell, CandidateSet, HouseKind, PuzzleView, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consistency {
    Consistent,
    Solved,
    Contradiction(Inconsistency),
}

/// Why a puzzle state cannot lead to a solution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// An unsolved cell has no candidates left
    EmptyCell(Cell),
    DuplicateValue { house: HouseKind, value: Value },
    /// A value has nowhere left to go in a complete house
    MissingValue { house: HouseKind, value: Value },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::EmptyCell(cell) => write!(f, "{} has no candidates", cell),
            Inconsistency::DuplicateValue { house, value } => {
                write!(f, "{} appears twice in {}", value, house)
            }
            Inconsistency::MissingValue { house, value } => {
                write!(f, "{} has no place in {}", value, house)
            }
        }
    }
}

pub fn check_consistency(view: &dyn PuzzleView) -> Consistency {
    let width = view.width();
    for cell in Cell::all(width) {
        if view.value_at(cell).is_none() && view.candidates_at(cell).is_empty() {
            return Consistency::Contradiction(Inconsistency::EmptyCell(cell));
        }
    }
    let domain = view.domain_size();
    for house in view.houses() {
        let mut placed = CandidateSet::new();
        let mut possible = CandidateSet::new();
        for &cell in house.cells() {
            match view.value_at(cell) {
                Some(value) => {
                    if placed.contains(value) {
                        return Consistency::Contradiction(Inconsistency::DuplicateValue {
                            house: house.kind(),
                            value,
                        });
                    }
                    placed.insert(value);
                }
                None => possible = possible | view.candidates_at(cell),
            }
        }
        if house.is_complete(domain) {
            let missing = CandidateSet::with_all(domain) - placed - possible;
            if let Some(value) = missing.min() {
                return Consistency::Contradiction(Inconsistency::MissingValue {
                    house: house.kind(),
                    value,
                });
            }
        }
    }
    if view.is_complete() {
        Consistency::Solved
    } else {
        Consistency::Consistent
    }
}
