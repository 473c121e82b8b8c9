use crate::position::{Range, Span};

/// Index of a token in [`crate::Ast::tokens`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenId(pub u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Punctuator,
    Identifier,
    Keyword,
    String,
    Numeric,
    Boolean,
    Null,
    Template,
    RegularExpression,
    Other,
}

impl TokenKind {
    pub fn from_type(name: &str) -> TokenKind {
        match name {
            "Punctuator" => TokenKind::Punctuator,
            "Identifier" => TokenKind::Identifier,
            "Keyword" => TokenKind::Keyword,
            "String" => TokenKind::String,
            "Numeric" => TokenKind::Numeric,
            "Boolean" => TokenKind::Boolean,
            "Null" => TokenKind::Null,
            "Template" => TokenKind::Template,
            "RegularExpression" => TokenKind::RegularExpression,
            _ => TokenKind::Other,
        }
    }
}

/// One entry of the parser's raw token stream. The translator only consults
/// tokens to detect source-explicit parentheses; it never re-lexes.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub loc: Range,
    pub span: Span,
}

impl Token {
    pub fn is_open_paren(&self) -> bool {
        self.kind == TokenKind::Punctuator && self.value == "("
    }

    pub fn is_close_paren(&self) -> bool {
        self.kind == TokenKind::Punctuator && self.value == ")"
    }
}
