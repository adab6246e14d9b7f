//! Error types for the noteseek crate.

use thiserror::Error;

/// Errors that can occur while parsing a query.
///
/// Evaluation never fails: once a query has parsed, every irregularity
/// (bad regex, unknown field, malformed property payload) resolves to a
/// boolean.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A `"` was opened and never closed.
    #[error("unterminated quote starting at offset {position}")]
    UnterminatedQuote { position: usize },

    /// A `[` property filter whose depth never returned to zero.
    #[error("unterminated property bracket starting at offset {position}")]
    UnterminatedBracket { position: usize },

    /// Normalizing the query would produce more clauses than allowed.
    #[error("query expands to more than {limit} clauses")]
    TooComplex { limit: usize },
}

/// Result type for noteseek operations.
pub type Result<T> = std::result::Result<T, QueryError>;
