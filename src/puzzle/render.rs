//! Plain text rendering of puzzle state

use itertools::Itertools;

use crate::puzzle::{Cell, PuzzleView, Value};

/// The character used for a value in text grids: `1-9` then `A-G`
pub fn value_char(value: Value) -> char {
    std::char::from_digit(u32::from(value), 17)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}

/// One line per row, `.` for unsolved cells
pub fn render_values(view: &dyn PuzzleView) -> String {
    let width = view.width();
    (0..width)
        .map(|row| {
            (0..width)
                .map(|col| view.value_at(Cell::new(row, col)).map_or('.', value_char))
                .collect::<String>()
        })
        .join("\n")
}

/// One line per row. Solved cells show their value in brackets, unsolved
/// cells their remaining candidates, padded to a common width.
pub fn render_candidates(view: &dyn PuzzleView) -> String {
    let width = view.width();
    let cells: Vec<String> = Cell::all(width)
        .map(|cell| match view.value_at(cell) {
            Some(value) => format!("[{}]", value_char(value)),
            None => view.candidates_at(cell).iter().map(value_char).collect(),
        })
        .collect();
    let pad = cells.iter().map(String::len).max().unwrap_or(0);
    cells
        .chunks(width)
        .map(|row| row.iter().map(|s| format!("{:<1$}", s, pad)).join(" "))
        .map(|line| line.trim_end().to_string())
        .join("\n")
}

#[cfg(test)]
mod tests {
    use crate::puzzle::render::{render_candidates, render_values};
    use crate::puzzle::{Family, Grid};

    #[test]
    fn values() {
        let grid = Grid::parse("1...\n..1.\n.1..\n...1", Family::Latin).unwrap();
        assert_eq!("1...\n..1.\n.1..\n...1", render_values(&grid));
    }

    #[test]
    fn candidates() {
        let grid = Grid::parse("1.\n..", Family::Latin).unwrap();
        assert_eq!("[1] 2\n2   12", render_candidates(&grid));
    }
}
