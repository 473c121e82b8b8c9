use crate::position::{Range, Span};

/// Index of a comment in [`crate::Ast::comments`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommentId(pub u32);

impl CommentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// A source comment. The same comment object can be reachable both as one
/// node's trailing comment and the next node's leading comment; ingestion
/// interns by source range so both attachments share one record, and the
/// `emitted` flag makes emission once-only.
#[derive(Clone, Debug)]
pub struct Comment {
    pub kind: CommentKind,
    /// Comment text without the `//` / `/*` `*/` delimiters.
    pub text: String,
    pub loc: Range,
    pub span: Span,
    pub emitted: bool,
}
