//! Byte/line/column position tracking shared by the parser, the inventory's
//! node ranges, and the report builder's spans.

use serde::{Deserialize, Serialize};

/// A single point in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the file.
    pub offset: u32,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }

    pub const fn start() -> Self {
        Self { offset: 0, line: 1, column: 1 }
    }
}

/// A half-open range `[from, to)` over source text, used for both the
/// inventory's per-node `NodeRange` and the report builder's per-span range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub from: Position,
    pub to: Position,
}

impl Range {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Whether this range touches the given 1-based line number at all.
    pub fn touches_line(&self, line: u32) -> bool {
        self.from.line <= line && line <= self.to.line
    }

    /// Clip this range to the column window of a single line, handling the
    /// four cases a range spanning multiple lines can take relative to it:
    /// entirely on the line, starting on it, ending on it, or passing
    /// through it.
    pub fn clip_to_line(&self, line: u32, line_length: u32) -> Option<(u32, u32)> {
        if !self.touches_line(line) {
            return None;
        }
        let from_col = if self.from.line == line { self.from.column } else { 1 };
        let to_col = if self.to.line == line { self.to.column } else { line_length + 1 };
        Some((from_col, to_col))
    }
}
