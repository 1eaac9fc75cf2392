use std::fmt;

use tyerr_common::Position;

/// A syntax error produced by the term parser, carrying the byte/line/col
/// position at which parsing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub pos: Position,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.message, self.pos.line, self.pos.column)
    }
}

impl std::error::Error for ParseError {}
