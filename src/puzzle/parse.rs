//! Parse grids from text

use crate::error::{ParseError, ParseErrorKind, ParsePuzzleError, UNEXPECTED_END};
use crate::puzzle::{Cell, Family, Grid, Value};

/// Parses one character per cell in row-major order. `.` and `0` are blank,
/// `1-9` then `A-G` are values. Whitespace is ignored.
pub(crate) fn parse_grid(s: &str, family: Family) -> Result<Grid, ParsePuzzleError> {
    let tokens = read_tokens(s)?;
    if tokens.is_empty() {
        return Err(UNEXPECTED_END.into());
    }
    let width = (tokens.len() as f64).sqrt().round() as usize;
    if width * width != tokens.len() {
        return Err(ParseError::new(ParseErrorKind::InvalidLength, tokens.len(), 0).into());
    }
    let mut grid = match family {
        Family::Sudoku => {
            let (box_rows, box_cols) = match width {
                4 => (2, 2),
                6 => (2, 3),
                9 => (3, 3),
                16 => (4, 4),
                _ => {
                    return Err(ParseError::new(ParseErrorKind::UnsupportedSize, width, 0).into())
                }
            };
            Grid::sudoku(box_rows, box_cols)?
        }
        Family::Latin => Grid::latin_square(width)
            .map_err(|_| ParseError::new(ParseErrorKind::UnsupportedSize, width, 0))?,
    };
    for (i, token) in tokens.into_iter().enumerate() {
        if let Some((index, value)) = token {
            if usize::from(value) > width {
                return Err(ParseError::new(ParseErrorKind::ValueOutOfRange, value, index).into());
            }
            grid.give(Cell::new(i / width, i % width), value)?;
        }
    }
    Ok(grid)
}

/// Reads one optional `(index, value)` per cell
fn read_tokens(s: &str) -> Result<Vec<Option<(usize, Value)>>, ParseError> {
    s.char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| match c {
            '.' | '0' => Ok(None),
            _ => c
                .to_digit(17)
                .map(|d| Some((i, d as Value)))
                .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidToken, c, i)),
        })
        .collect()
}
