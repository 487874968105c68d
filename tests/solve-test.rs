use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use gridlogic::puzzle::render::render_values;
use gridlogic::puzzle::{CandidateSet, Cell, Family, Grid, House, MutationSink, PuzzleView};
use gridlogic::solve::{check_consistency, Consistency, Solver, SolverState};
use gridlogic::strategy::NakedSingle;

#[test]
fn test_puzzles() -> Result<()> {
    test_puzzle_dir(project_path("res/test/puzzles/solved/sudoku"), Family::Sudoku, true)?;
    test_puzzle_dir(project_path("res/test/puzzles/solved/latin"), Family::Latin, true)?;
    test_puzzle_dir(project_path("res/test/puzzles/hard/sudoku"), Family::Sudoku, false)?;
    Ok(())
}

/// Each file holds a puzzle and its solution separated by a blank line
fn read_puzzle(path: &Path, family: Family) -> Result<(Grid, Grid)> {
    let text = fs::read_to_string(path)?;
    let mut parts = text.split("\n\n").filter(|s| !s.trim().is_empty());
    let puzzle = parts.next().ok_or_else(|| anyhow!("missing puzzle"))?;
    let solution = parts.next().ok_or_else(|| anyhow!("missing solution"))?;
    Ok((Grid::parse(puzzle, family)?, Grid::parse(solution, family)?))
}

fn test_puzzle_dir(path: impl AsRef<Path>, family: Family, require_solved: bool) -> Result<()> {
    let mut files: Vec<_> = fs::read_dir(path).unwrap().map(|f| f.unwrap()).collect();
    files.sort_unstable_by_key(|f| f.path());
    for file in files {
        println!("Solving {}", file.path().display());
        let (puzzle, solution) = read_puzzle(&file.path(), family)?;
        let mut solver = Solver::new(puzzle);
        let state = solver.solve()?;
        let display = file.path().display().to_string();
        if require_solved {
            assert_eq!(SolverState::Solved, state, "{}", display);
            assert_eq!(
                render_values(&solution),
                render_values(solver.puzzle()),
                "{}",
                display
            );
        } else {
            assert_ne!(SolverState::Contradiction, state, "{}", display);
        }
        let puzzle = solver.puzzle();
        for cell in Cell::all(puzzle.width()) {
            if let Some(expected) = solution.value_at(cell) {
                match puzzle.value_at(cell) {
                    Some(value) => assert_eq!(expected, value, "{} {}", display, cell),
                    None => assert!(puzzle.candidates_at(cell).contains(expected)),
                }
            }
        }
    }
    Ok(())
}

/// Forwards to a grid and counts the values placed
#[derive(Clone)]
struct RecordingGrid {
    grid: Grid,
    placements: Vec<(Cell, u8)>,
}

impl PuzzleView for RecordingGrid {
    fn width(&self) -> usize {
        self.grid.width()
    }

    fn domain_size(&self) -> usize {
        self.grid.domain_size()
    }

    fn candidates_at(&self, cell: Cell) -> CandidateSet {
        self.grid.candidates_at(cell)
    }

    fn value_at(&self, cell: Cell) -> Option<u8> {
        self.grid.value_at(cell)
    }

    fn houses(&self) -> &[House] {
        self.grid.houses()
    }
}

impl MutationSink for RecordingGrid {
    fn set_value(&mut self, cell: Cell, value: u8) {
        self.placements.push((cell, value));
        self.grid.set_value(cell, value);
    }

    fn remove_candidate(&mut self, cell: Cell, value: u8) {
        self.grid.remove_candidate(cell, value);
    }
}

fn recording(grid: Grid) -> RecordingGrid {
    RecordingGrid {
        grid,
        placements: Vec::new(),
    }
}

#[test]
fn single_candidate_cell_sets_value_once() -> Result<()> {
    let mut grid = Grid::sudoku(3, 3)?;
    let cell = Cell::new(4, 4);
    grid.set_candidates(cell, CandidateSet::from_values(&[5]));
    let mut solver = Solver::new(recording(grid));
    solver.strategies(vec![Box::new(NakedSingle)]);
    assert_eq!(SolverState::Stalled, solver.solve()?);
    assert_eq!(vec![(cell, 5)], solver.puzzle().placements);
    assert_eq!(1, solver.history().len());
    Ok(())
}

#[test]
fn last_empty_cell_is_placed_once() -> Result<()> {
    let grid = Grid::parse(
        "534678912672195348198342567859761423426853791713924856961537284287419635345286.79",
        Family::Sudoku,
    )?;
    let mut solver = Solver::new(recording(grid));
    assert_eq!(SolverState::Solved, solver.solve()?);
    let cell = Cell::new(8, 6);
    assert_eq!(vec![(cell, 1)], solver.puzzle().placements);
    assert_eq!(1, solver.history().len());
    assert_eq!(Consistency::Solved, check_consistency(solver.puzzle()));
    Ok(())
}

fn project_path(path: impl AsRef<Path>) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
}
