//! Rule-based deduction engine for grid logic puzzles

#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

#[macro_use]
extern crate log;

pub mod collections;
pub mod error;
pub mod graph;
pub mod puzzle;
pub mod solve;
pub mod strategy;

pub(crate) type HashSet<T> = std::collections::HashSet<T, ahash::RandomState>;
