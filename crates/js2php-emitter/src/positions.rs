//! Token position maps for source-explicit parenthesis detection.
//!
//! The parser drops parentheses from the AST, so the only way to know the
//! author wrote `(a + b)` is to look at the raw token stream: a node was
//! parenthesized when a `(` token ends where the node starts and a `)`
//! token starts where the node ends. Whitespace between the parenthesis and
//! the expression must not defeat the match, so token start positions are
//! slid backwards over whitespace and end positions forward before keying.

use js2php_ast::{Position, Range, Token, TokenId};
use rustc_hash::FxHashMap;

pub struct PositionIndex {
    /// Keyed by token start position, slid backwards.
    starts: FxHashMap<(u32, u32), TokenId>,
    /// Keyed by token end position, slid forward.
    ends: FxHashMap<(u32, u32), TokenId>,
}

impl PositionIndex {
    pub fn build(source: &str, tokens: &[Token]) -> Self {
        let lines: Vec<&[u8]> = source.split('\n').map(str::as_bytes).collect();
        let mut starts = FxHashMap::default();
        let mut ends = FxHashMap::default();
        for (i, token) in tokens.iter().enumerate() {
            let id = TokenId(i as u32);
            let start = slide_back(&lines, token.loc.start);
            starts.insert((start.line, start.column), id);
            let end = slide_fwd(&lines, token.loc.end);
            ends.insert((end.line, end.column), id);
        }
        PositionIndex { starts, ends }
    }

    /// True when the source wrapped the node's extent in literal
    /// parentheses.
    pub fn paren_wrapped(&self, tokens: &[Token], loc: Range) -> bool {
        let open = self
            .ends
            .get(&(loc.start.line, loc.start.column))
            .and_then(|id| tokens.get(id.index()))
            .is_some_and(Token::is_open_paren);
        if !open {
            return false;
        }
        self.starts
            .get(&(loc.end.line, loc.end.column))
            .and_then(|id| tokens.get(id.index()))
            .is_some_and(Token::is_close_paren)
    }
}

fn is_ws(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r')
}

fn slide_fwd(lines: &[&[u8]], pos: Position) -> Position {
    let mut line = pos.line as usize;
    let mut col = pos.column as usize;
    loop {
        let Some(text) = lines.get(line.wrapping_sub(1)) else { break };
        let Some(&c) = text.get(col) else { break };
        if !is_ws(c) {
            break;
        }
        col += 1;
        if col >= text.len() {
            col = 0;
            line += 1;
        }
    }
    Position::new(line as u32, col as u32)
}

/// Slides within the line only; a token at column 0 keys as-is.
fn slide_back(lines: &[&[u8]], pos: Position) -> Position {
    let Some(text) = lines.get((pos.line as usize).wrapping_sub(1)) else {
        return pos;
    };
    let mut col = pos.column as usize;
    while col > 0 {
        let Some(&c) = text.get(col - 1) else { break };
        if !is_ws(c) {
            break;
        }
        col -= 1;
    }
    Position::new(pos.line, col as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use js2php_ast::{Span, TokenKind};

    fn token(value: &str, line: u32, start_col: u32) -> Token {
        let end_col = start_col + value.len() as u32;
        Token {
            kind: TokenKind::Punctuator,
            value: value.to_string(),
            loc: Range {
                start: Position::new(line, start_col),
                end: Position::new(line, end_col),
            },
            span: Span::default(),
        }
    }

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range { start: Position::new(sl, sc), end: Position::new(el, ec) }
    }

    #[test]
    fn detects_tight_parens() {
        // r = (a + b);
        let source = "r = (a + b);";
        let tokens = vec![token("(", 1, 4), token(")", 1, 10)];
        let index = PositionIndex::build(source, &tokens);
        assert!(index.paren_wrapped(&tokens, range(1, 5, 1, 10)));
    }

    #[test]
    fn whitespace_between_paren_and_expression_still_matches() {
        // r = ( a + b );
        let source = "r = ( a + b );";
        let tokens = vec![token("(", 1, 4), token(")", 1, 12)];
        let index = PositionIndex::build(source, &tokens);
        assert!(index.paren_wrapped(&tokens, range(1, 6, 1, 11)));
    }

    #[test]
    fn unparenthesized_extent_does_not_match() {
        let source = "r = a + b;";
        let tokens = vec![token("(", 1, 20), token(")", 1, 30)];
        let index = PositionIndex::build(source, &tokens);
        assert!(!index.paren_wrapped(&tokens, range(1, 4, 1, 9)));
    }

    #[test]
    fn non_paren_punctuator_at_boundary_does_not_match() {
        let source = "f[a + b]";
        let tokens = vec![token("[", 1, 1), token("]", 1, 7)];
        let index = PositionIndex::build(source, &tokens);
        assert!(!index.paren_wrapped(&tokens, range(1, 2, 1, 7)));
    }
}
