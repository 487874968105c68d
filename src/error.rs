use std::fmt::{Display, Formatter};
use std::{fmt, io};

use thiserror::Error;

#[derive(Error, Debug)]
#[error("invalid puzzle: {}", msg)]
pub struct InvalidPuzzle {
    msg: String,
}

impl InvalidPuzzle {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Error, Debug)]
pub enum PuzzleFromFileError {
    #[error("error reading puzzle file")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParsePuzzleError),
}

pub const UNEXPECTED_END: ParseError = ParseError::from_kind(ParseErrorKind::UnexpectedEnd);

#[derive(Debug, Error)]
pub enum ParsePuzzleError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    InvalidPuzzle(#[from] InvalidPuzzle),
}

#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub struct ParseError {
    kind: ParseErrorKind,
    token: Option<String>,
    index: Option<usize>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, token: impl Display, index: usize) -> Self {
        Self {
            kind,
            token: Some(token.to_string()),
            index: Some(index),
        }
    }

    pub(crate) const fn from_kind(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            token: None,
            index: None,
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(test, derive(PartialEq))]
pub enum ParseErrorKind {
    InvalidToken,
    InvalidLength,
    UnsupportedSize,
    ValueOutOfRange,
    UnexpectedEnd,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::InvalidToken => "Invalid token",
            ParseErrorKind::InvalidLength => "Cell count is not a square",
            ParseErrorKind::UnsupportedSize => "Unsupported puzzle size",
            ParseErrorKind::ValueOutOfRange => "Value out of range",
            ParseErrorKind::UnexpectedEnd => "Unexpected end",
        };
        write!(f, "{}", s)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(token) = &self.token {
            write!(f, ": \"{}\"", token)?;
        }
        if let Some(index) = &self.index {
            write!(f, " at {}", index)?;
        }
        Ok(())
    }
}
