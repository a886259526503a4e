//! Source positions and ranges of bound nodes.
//!
//! Ranges use the editor's `(line, column)` coordinates as produced by the
//! parser; whether those are zero- or one-based is decided upstream and only
//! matters when validating an incoming cursor (see [`IndexBase`]).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A cursor or boundary location in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// How the upstream parser numbers lines and columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexBase {
    Zero,
    /// Monaco numbers both lines and columns from 1
    #[default]
    One,
}

impl IndexBase {
    /// Returns true if `position` can exist in a document numbered this way.
    pub fn is_representable(self, position: Position) -> bool {
        match self {
            IndexBase::Zero => true,
            IndexBase::One => position.line >= 1 && position.column >= 1,
        }
    }
}

/// Interval `[start, end]` over document positions.
///
/// Invariant: `start <= end` in document order. Ranges produced by
/// [`TextRange::new`] always hold it; deserialized ranges are checked by
/// tree validation before any query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub line1: u32,
    pub column1: u32,
    pub line2: u32,
    pub column2: u32,
}

impl TextRange {
    /// Creates a range, swapping the endpoints if they were given in reverse.
    pub fn new(start: Position, end: Position) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        TextRange {
            line1: start.line,
            column1: start.column,
            line2: end.line,
            column2: end.column,
        }
    }

    /// Zero-width range at `position`.
    pub fn empty(position: Position) -> Self {
        TextRange::new(position, position)
    }

    pub fn start(&self) -> Position {
        Position::new(self.line1, self.column1)
    }

    pub fn end(&self) -> Position {
        Position::new(self.line2, self.column2)
    }

    pub fn is_well_formed(&self) -> bool {
        self.start() <= self.end()
    }

    /// The position lies within `[start, end]`, both ends inclusive, so a cursor
    /// placed right after the last character of a token still belongs to it.
    pub fn contains(&self, position: Position) -> bool {
        self.start() <= position && position <= self.end()
    }

    /// The range ends strictly before `position`.
    pub fn is_before(&self, position: Position) -> bool {
        self.end() < position
    }

    /// The range starts strictly after `position`.
    pub fn is_after(&self, position: Position) -> bool {
        self.start() > position
    }

    /// Returns true if `other` lies entirely inside this range.
    pub fn encloses(&self, other: &TextRange) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start(), self.end())
    }
}
