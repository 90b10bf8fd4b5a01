//! Source positions for diagnostics.
//!
//! Both `line` and `column` are 1-based, and a column counts Unicode code
//! points consumed on the current line - not bytes, not UTF-16 units.

use std::fmt;

/// A position in the script source.
///
/// Every token carries the position of its *first* character, so that
/// diagnostics point at the start of the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position of the very first character of the input.
    pub fn first() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}:{})", self.line, self.column)
    }
}
