//! Errors the scanner can raise. All three carry the stream position the
//! offending token started at, not where the scanner gave up.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid token at position {0}: {1:?}")]
    InvalidToken(usize, char),

    #[error("unterminated comment starting at position {0}")]
    UnterminatedComment(usize),

    #[error("unterminated string literal starting at position {0}")]
    UnterminatedString(usize),
}
