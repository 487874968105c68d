#![feature(test)]

extern crate test;

use std::fs;
use std::path::Path;

use gridlogic::puzzle::{Family, Grid};
use gridlogic::solve::Solver;
use test::Bencher;

fn load(name: &str) -> Grid {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("res/test/puzzles").join(name);
    let text = fs::read_to_string(path).unwrap();
    let puzzle = text.split("\n\n").next().unwrap();
    Grid::parse(puzzle, Family::Sudoku).unwrap()
}

#[bench]
fn bench_singles(b: &mut Bencher) {
    let grid = load("solved/sudoku/euler02.txt");
    b.iter(|| Solver::new(grid.clone()).solve().unwrap());
}

#[bench]
fn bench_locked_candidates(b: &mut Bencher) {
    let grid = load("solved/sudoku/norvig.txt");
    b.iter(|| Solver::new(grid.clone()).solve().unwrap());
}

#[bench]
fn bench_easter_monster(b: &mut Bencher) {
    let grid = load("hard/sudoku/easter.txt");
    b.iter(|| Solver::new(grid.clone()).solve().unwrap());
}
