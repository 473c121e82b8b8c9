use std::fmt;

use js2php_ast::EstreeError;

/// Translation failure. Errors are fatal: no partial PHP output is
/// produced.
#[derive(Debug)]
pub enum Error {
    /// The dispatcher reached a node kind it has no rule for.
    Unsupported {
        kind: String,
        /// Where it happened (source line, or a short description).
        detail: String,
    },
    /// The input document does not have the expected ESTree shape.
    Malformed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unsupported { kind, detail } => {
                write!(f, "`{kind}` is not supported ({detail})")
            }
            Error::Malformed(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<EstreeError> for Error {
    fn from(err: EstreeError) -> Self {
        Error::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
