use serde::{Deserialize, Serialize};

/// A point in the source text. Lines are 1-based and columns 0-based,
/// matching the ESTree `loc` convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// The `loc` of a node, token or comment: start and end positions, the end
/// exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Location carried by synthesized nodes. Line 0 sorts before every real
    /// source line, so the emitter's line sync never advances for it, and it
    /// never collides with a token-map entry.
    pub const SYNTHETIC: Range = Range {
        start: Position { line: 0, column: 0 },
        end: Position { line: 0, column: 0 },
    };

    pub fn is_synthetic(&self) -> bool {
        self.start.line == 0
    }
}

/// Half-open byte range `[start, end)` into the source text (the ESTree
/// `range` field).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }
}
