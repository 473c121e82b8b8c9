//! Structural ECMAScript-to-PHP translation.
//!
//! The engine is a single recursive walk over the arena AST: one emission
//! rule per node kind, scope tracking on the side for sigils/captures, and
//! a builtin evaluator that rewrites well-known calls into PHP library
//! calls before emission. Translation is line-preserving: output text is
//! kept in sync with source line numbers so blank lines and comments land
//! where they were written.

mod builtins;
mod emitter;
mod positions;
mod scope;
mod translator;

pub mod error;
pub mod options;

pub use error::{Error, Result};
pub use options::Options;

use js2php_ast::{Ast, estree};

/// Translates an ingested document to PHP source text.
pub fn translate(ast: Ast, options: &Options) -> Result<String> {
    let _span = tracing::debug_span!(
        "translate",
        nodes = ast.nodes.len(),
        tokens = ast.tokens.len(),
        comments = ast.comments.len(),
    )
    .entered();
    translator::Translator::new(ast, options.clone()).run()
}

/// Ingests an ESTree JSON document and translates it. `source` is the
/// JavaScript text the document was parsed from.
pub fn translate_json(
    document: &serde_json::Value,
    source: &str,
    options: &Options,
) -> Result<String> {
    let ast = estree::ast_from_json(document, source)?;
    translate(ast, options)
}
