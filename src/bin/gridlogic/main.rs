#![warn(rust_2018_idioms)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unused_qualifications)]

use anyhow::{Context, Result};
use gridlogic::puzzle::render::render_values;
use gridlogic::puzzle::Grid;
use gridlogic::solve::{Solver, SolverState};

use crate::options::{Options, Source};

mod options;

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::from_args()?;
    let puzzle = match options.source() {
        Source::File(path) => {
            println!("Reading puzzle from \"{}\"", path.display());
            Grid::from_file(path, options.family())
                .with_context(|| format!("failed to read {}", path.display()))?
        }
        Source::Text(text) => Grid::parse(text, options.family())?,
    };
    print!("{}", render_values(&puzzle));
    println!();

    let mut solver = Solver::new(puzzle);
    solver.max_difficulty(options.max_difficulty());
    if let Some(path) = options.save_steps() {
        solver.save_steps(path);
    }
    let state = solver.solve()?;
    if options.history() {
        for (i, step) in solver.history().iter().enumerate() {
            println!("{:>3}. {}", i + 1, step);
        }
        println!();
    }
    let msg = match state {
        SolverState::Solved => "Puzzle solved",
        SolverState::Contradiction => "Puzzle has no solution",
        SolverState::Stalled => "No strategy applies",
        SolverState::Cancelled => "Solve cancelled",
        SolverState::Idle | SolverState::Running => "Solve did not finish",
    };
    println!("{} in {} steps", msg, solver.history().len());
    print!("{}", render_values(solver.puzzle()));
    Ok(())
}
