//! AST support for the js2php translator.
//!
//! The translator does not parse JavaScript itself; it consumes the JSON
//! document an ESTree-compatible parser (espree/acorn, run with `loc`,
//! `range`, `tokens` and comment attachment enabled) produces. This crate
//! owns the arena representation of that document: nodes, tokens, comments
//! and the ingestion code that builds the arena from `serde_json` values.

pub mod ast;
pub mod comment;
pub mod estree;
pub mod names;
pub mod node;
pub mod position;
pub mod token;

pub use ast::Ast;
pub use comment::{Comment, CommentId, CommentKind};
pub use estree::EstreeError;
pub use node::{FunctionParts, LiteralValue, MethodKind, Node, NodeFlags, NodeId, NodeKind};
pub use position::{Position, Range, Span};
pub use token::{Token, TokenId, TokenKind};
