//! A square grid container, one element per `Cell`

use std::convert::TryFrom;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Deref, Index, IndexMut};

use crate::puzzle::Cell;

/// A value that can be converted to a row-major index given the square width
pub trait AsSquareIndex: Copy {
    fn as_square_index(self, width: usize) -> usize;
}

impl AsSquareIndex for usize {
    fn as_square_index(self, _width: usize) -> usize {
        self
    }
}

impl AsSquareIndex for Cell {
    fn as_square_index(self, width: usize) -> usize {
        debug_assert!(self.row < width && self.col < width);
        self.row * width + self.col
    }
}

/// A container of elements represented in a square grid
#[derive(Clone, Debug, PartialEq)]
pub struct Square<T> {
    width: usize,
    elements: Vec<T>,
}

impl<T> Square<T> {
    /// Creates a new square with a specified width and fill with the default value
    pub fn with_width(width: usize) -> Square<T>
    where
        T: Clone + Default,
    {
        Self::with_width_and_value(width, Default::default())
    }

    /// Create a new `Square` of a specified width and fill with a specified value
    pub fn with_width_and_value(width: usize, val: T) -> Square<T>
    where
        T: Clone,
    {
        Square {
            width,
            elements: vec![val; width.pow(2)],
        }
    }

    /// Returns the width (and height) of the grid
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the `Cell` at a row-major index
    pub fn cell_at(&self, index: usize) -> Cell {
        assert!(index < self.elements.len());
        Cell::new(index / self.width, index % self.width)
    }

    /// Returns an iterator over the rows of the square
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.elements.chunks(self.width)
    }

    /// Returns an iterator over every element, paired with its `Cell`
    pub fn iter_cell(&self) -> impl Iterator<Item = (Cell, &T)> {
        let width = self.width;
        self.elements
            .iter()
            .enumerate()
            .map(move |(i, e)| (Cell::new(i / width, i % width), e))
    }

    /// Creates a new square by applying a function to every element
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Square<U> {
        Square {
            width: self.width,
            elements: self.elements.iter().map(f).collect(),
        }
    }

    /// Returns a copy of the square mirrored along its main diagonal
    pub fn transposed(&self) -> Square<T>
    where
        T: Clone,
    {
        let width = self.width;
        let elements = (0..self.elements.len())
            .map(|i| self[Cell::new(i / width, i % width).transposed()].clone())
            .collect();
        Square { width, elements }
    }
}

impl<T> Deref for Square<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.elements
    }
}

impl<T, I: AsSquareIndex> Index<I> for Square<T> {
    type Output = T;

    fn index(&self, index: I) -> &Self::Output {
        &self.elements[index.as_square_index(self.width)]
    }
}

impl<T, I: AsSquareIndex> IndexMut<I> for Square<T> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.elements[index.as_square_index(self.width)]
    }
}

impl<T> Display for Square<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let len = self
            .elements
            .iter()
            .map(|e| e.to_string().len())
            .max()
            .unwrap_or(0);
        for row in self.rows() {
            for element in row {
                write!(f, "{:>1$} ", element, len)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(PartialEq)]
pub struct NonSquareLength(usize);

impl Debug for NonSquareLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "The length of elements ({}) is not square", self.0)
    }
}

impl<T> TryFrom<Vec<T>> for Square<T> {
    type Error = NonSquareLength;

    fn try_from(elements: Vec<T>) -> Result<Self, Self::Error> {
        let width = (elements.len() as f64).sqrt().round() as usize;
        if elements.len() != width.pow(2) {
            return Err(NonSquareLength(elements.len()));
        }
        Ok(Self { width, elements })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use crate::collections::square::NonSquareLength;
    use crate::collections::Square;
    use crate::puzzle::Cell;

    #[test]
    fn try_from_vec() {
        assert!(Square::try_from(vec![1; 9]).is_ok())
    }

    #[test]
    fn try_from_non_square_vec() {
        assert_eq!(Err(NonSquareLength(8)), Square::try_from(vec![1; 8]))
    }

    #[test]
    fn index_by_cell() {
        let square = Square::try_from((0..9).collect::<Vec<_>>()).unwrap();
        assert_eq!(5, square[Cell::new(1, 2)]);
        assert_eq!(Cell::new(2, 1), square.cell_at(7));
    }

    #[test]
    fn transposed() {
        let square = Square::try_from((0..9).collect::<Vec<_>>()).unwrap();
        let transposed = square.transposed();
        assert_eq!(vec![0, 3, 6, 1, 4, 7, 2, 5, 8], transposed.to_vec());
        assert_eq!(square, transposed.transposed());
    }
}
