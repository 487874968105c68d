//! Explanations of applied deductions
//!
//! A [`Report`] pairs free text with a list of [`Highlight`]s that a viewer
//! can replay over the puzzle state from before the step.

use std::fmt;

use crate::graph::{Chain, ColorEntry, Label, LinkElement, Loop, Strength};
use crate::puzzle::{Cell, CellCandidate, PuzzleView, Value};
use crate::solve::Change;
use crate::HashSet;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub explanation: String,
    pub highlights: Vec<Highlight>,
}

impl Report {
    pub fn new(explanation: impl Into<String>, highlights: Vec<Highlight>) -> Self {
        Self {
            explanation: explanation.into(),
            highlights,
        }
    }
}

/// Builds the report of a commit once it has been applied. `changes` are the
/// changes that took effect and `snapshot` is the state before any of them.
pub trait ReportBuilder: Send {
    fn build(
        self: Box<Self>,
        changes: &[Change],
        snapshot: &dyn PuzzleView,
    ) -> anyhow::Result<Report>;
}

impl<F> ReportBuilder for F
where
    F: FnOnce(&[Change], &dyn PuzzleView) -> anyhow::Result<Report> + Send,
{
    fn build(
        self: Box<Self>,
        changes: &[Change],
        snapshot: &dyn PuzzleView,
    ) -> anyhow::Result<Report> {
        (*self)(changes, snapshot)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightColor {
    Focus,
    On,
    Off,
    Removal,
    Placement,
}

const COLORS: [HighlightColor; 5] = [
    HighlightColor::Focus,
    HighlightColor::On,
    HighlightColor::Off,
    HighlightColor::Removal,
    HighlightColor::Placement,
];

impl HighlightColor {
    fn index(self) -> u32 {
        match self {
            HighlightColor::Focus => 0,
            HighlightColor::On => 1,
            HighlightColor::Off => 2,
            HighlightColor::Removal => 3,
            HighlightColor::Placement => 4,
        }
    }
}

impl From<Label> for HighlightColor {
    fn from(label: Label) -> Self {
        match label {
            Label::On => HighlightColor::On,
            Label::Off => HighlightColor::Off,
        }
    }
}

/// One drawing instruction
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Highlight {
    Cell {
        cell: Cell,
        color: HighlightColor,
    },
    Candidate {
        candidate: CellCandidate,
        color: HighlightColor,
    },
    /// A group of candidates such as a pointing set
    Element {
        element: LinkElement,
        color: HighlightColor,
    },
    Link {
        from: LinkElement,
        to: LinkElement,
        strength: Strength,
    },
}

// encoded layout, high to low:
//   tag:2 | payload:28
//   cell:       row:4 col:4 color:4
//   candidate:  row:4 col:4 value-1:4 color:4
//   link:       strength:1 from:12 to:12, each candidate as row:4 col:4 value-1:4
const TAG_SHIFT: u32 = 28;
const TAG_CELL: u32 = 0;
const TAG_CANDIDATE: u32 = 1;
const TAG_LINK: u32 = 2;

fn encode_candidate(c: CellCandidate) -> u32 {
    (c.cell.row as u32) << 8 | (c.cell.col as u32) << 4 | u32::from(c.value - 1)
}

fn decode_candidate(bits: u32) -> CellCandidate {
    CellCandidate::new(
        Cell::new((bits >> 8 & 0xF) as usize, (bits >> 4 & 0xF) as usize),
        (bits & 0xF) as Value + 1,
    )
}

impl Highlight {
    /// Packs cell, candidate and candidate-to-candidate link highlights into a
    /// `u32` for compact replay logs. Group elements have no encoding.
    pub fn encode(&self) -> Option<u32> {
        let bits = match self {
            Highlight::Cell { cell, color } => {
                TAG_CELL << TAG_SHIFT | (cell.row as u32) << 8 | (cell.col as u32) << 4 | color.index()
            }
            Highlight::Candidate { candidate, color } => {
                TAG_CANDIDATE << TAG_SHIFT | encode_candidate(*candidate) << 4 | color.index()
            }
            Highlight::Link { from, to, strength } => {
                let strong = match strength {
                    Strength::Strong => 1,
                    Strength::Weak => 0,
                };
                TAG_LINK << TAG_SHIFT
                    | strong << 24
                    | encode_candidate(from.candidate()?) << 12
                    | encode_candidate(to.candidate()?)
            }
            Highlight::Element { .. } => return None,
        };
        Some(bits)
    }

    pub fn decode(bits: u32) -> Option<Self> {
        let color = || COLORS.get((bits & 0xF) as usize).copied();
        let highlight = match bits >> TAG_SHIFT {
            TAG_CELL => Highlight::Cell {
                cell: Cell::new((bits >> 8 & 0xF) as usize, (bits >> 4 & 0xF) as usize),
                color: color()?,
            },
            TAG_CANDIDATE => Highlight::Candidate {
                candidate: decode_candidate(bits >> 4),
                color: color()?,
            },
            TAG_LINK => Highlight::Link {
                from: LinkElement::Candidate(decode_candidate(bits >> 12)),
                to: LinkElement::Candidate(decode_candidate(bits)),
                strength: if bits >> 24 & 1 == 1 {
                    Strength::Strong
                } else {
                    Strength::Weak
                },
            },
            _ => return None,
        };
        Some(highlight)
    }
}

impl fmt::Display for Highlight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Highlight::Cell { cell, color } => write!(f, "{:?} {}", color, cell),
            Highlight::Candidate { candidate, color } => write!(f, "{:?} {}", color, candidate),
            Highlight::Element { element, color } => write!(f, "{:?} {}", color, element),
            Highlight::Link { from, to, strength } => {
                write!(f, "{:?} link {} to {}", strength, from, to)
            }
        }
    }
}

/// Collects highlights for one report, dropping repeats
#[derive(Default)]
pub struct HighlightCompiler {
    highlights: Vec<Highlight>,
    seen: HashSet<Highlight>,
}

impl HighlightCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, highlight: Highlight) -> &mut Self {
        if self.seen.insert(highlight.clone()) {
            self.highlights.push(highlight);
        }
        self
    }

    pub fn cell(&mut self, cell: Cell, color: HighlightColor) -> &mut Self {
        self.add(Highlight::Cell { cell, color })
    }

    pub fn candidate(&mut self, candidate: CellCandidate, color: HighlightColor) -> &mut Self {
        self.add(Highlight::Candidate { candidate, color })
    }

    /// Highlights a plain candidate as such, anything else as a group
    pub fn element(&mut self, element: &LinkElement, color: HighlightColor) -> &mut Self {
        match element.candidate() {
            Some(candidate) => self.candidate(candidate, color),
            None => self.add(Highlight::Element {
                element: element.clone(),
                color,
            }),
        }
    }

    pub fn link(&mut self, from: &LinkElement, to: &LinkElement, strength: Strength) -> &mut Self {
        self.add(Highlight::Link {
            from: from.clone(),
            to: to.clone(),
            strength,
        })
    }

    pub fn changes(&mut self, changes: &[Change]) -> &mut Self {
        for change in changes {
            match *change {
                Change::Placement(c) => self.candidate(c, HighlightColor::Placement),
                Change::Removal(c) => self.candidate(c, HighlightColor::Removal),
            };
        }
        self
    }

    /// Alternating On/Off elements along the chain, and its links. The start is
    /// Off if the chain leaves it by a strong link.
    pub fn chain(&mut self, chain: &Chain<LinkElement>) -> &mut Self {
        let mut label = match chain.links().next() {
            Some((_, Strength::Strong, _)) | None => Label::Off,
            Some((_, Strength::Weak, _)) => Label::On,
        };
        for vertex in chain.vertices() {
            self.element(vertex, label.into());
            label = !label;
        }
        for (from, strength, to) in chain.links() {
            self.link(from, to, strength);
        }
        self
    }

    pub fn cycle(&mut self, cycle: &Loop<LinkElement>) -> &mut Self {
        for vertex in cycle.vertices() {
            self.element(vertex, HighlightColor::Focus);
        }
        for (from, strength, to) in cycle.links() {
            self.link(from, to, strength);
        }
        self
    }

    /// The labels of a recorded coloring trace and the links that forced them
    pub fn coloring_trace(&mut self, trace: &[(LinkElement, ColorEntry)]) -> &mut Self {
        for (vertex, entry) in trace {
            self.element(vertex, entry.label.into());
            if let (Some(parent), Some(strength)) = (&entry.parent, entry.strength) {
                self.link(parent, vertex, strength);
            }
        }
        self
    }

    pub fn finish(&mut self) -> Vec<Highlight> {
        self.seen.clear();
        std::mem::take(&mut self.highlights)
    }
}
