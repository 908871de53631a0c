//! Capability error types.

use std::fmt;
use thiserror::Error;

/// A capability string that does not conform to the grammar.
///
/// `offset` is the byte position of the first character that was not
/// consumed: just past the last grant that parsed completely, or `0` when
/// not even the first grant could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    original: String,
    offset: usize,
    expected: &'static str,
}

impl ParseError {
    pub(crate) fn new(original: &str, offset: usize, expected: &'static str) -> Self {
        Self {
            original: original.to_string(),
            offset,
            expected,
        }
    }

    /// The full text handed to the parser.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Byte offset of the first unconsumed character.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The unparsed tail of the input.
    pub fn remainder(&self) -> &str {
        &self.original[self.offset..]
    }

    /// What the parser was looking for at the furthest point it reached.
    pub fn expected(&self) -> &'static str {
        self.expected
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remainder = self.remainder();
        let original = &self.original;
        write!(f, "moncap parse failed, stopped at '{remainder}' of '{original}'")
    }
}

impl std::error::Error for ParseError {}

/// Capability errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The capability string could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No combination of matching grants covers the request.
    #[error("capability denied: {0}")]
    Denied(String),
}

pub type Result<T> = std::result::Result<T, Error>;
