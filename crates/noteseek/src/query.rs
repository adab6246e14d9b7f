//! Parsed queries.
//!
//! A [`Query`] is the disjunctive normal form of one query string: a list of
//! clauses where a record matches if every term of at least one clause holds.

use serde::{Deserialize, Serialize};

use crate::clause::Clause;
use crate::error::Result;
use crate::lexer::tokenize;
use crate::options::SearchOptions;
use crate::parser::{parse_tokens, to_dnf};
use crate::predicate::Predicate;

/// A query in disjunctive normal form.
///
/// # Example
///
/// ```
/// use noteseek::{Query, Term};
///
/// let query = Query::parse("alpha (beta OR gamma)").unwrap();
/// assert_eq!(query.clauses(), &[
///     vec![Term::bare("alpha"), Term::bare("beta")],
///     vec![Term::bare("alpha"), Term::bare("gamma")],
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Default for Query {
    /// The match-all query: one clause with no terms.
    fn default() -> Self {
        Query {
            clauses: vec![Vec::new()],
        }
    }
}

impl Query {
    /// Parses a query string with default options.
    pub fn parse(input: &str) -> Result<Self> {
        Query::parse_with(input, &SearchOptions::default())
    }

    /// Parses a query string.
    ///
    /// # Errors
    ///
    /// Fails on unterminated quotes or brackets, and when the normal form
    /// would exceed [`SearchOptions::max_clauses`].
    pub fn parse_with(input: &str, options: &SearchOptions) -> Result<Self> {
        let tokens = tokenize(input)?;
        let expr = parse_tokens(tokens);
        let clauses = to_dnf(expr.as_ref(), options.max_clauses)?;
        tracing::debug!(query = input, clauses = clauses.len(), "parsed query");
        Ok(Query { clauses })
    }

    /// Wraps an existing clause list, such as one loaded from a cache.
    pub fn from_clauses(clauses: Vec<Clause>) -> Self {
        Query { clauses }
    }

    /// Returns the clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Consumes the query, returning its clauses.
    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    /// Returns `true` if some clause has no terms, so every record matches.
    pub fn is_match_all(&self) -> bool {
        self.clauses.iter().any(Vec::is_empty)
    }

    /// Compiles the query into a predicate.
    pub fn compile(&self, options: &SearchOptions) -> Predicate {
        Predicate::new(&self.clauses, options)
    }

    /// Compiles the query with the given default field.
    pub fn matcher(&self, default_field: &str) -> Predicate {
        self.compile(&SearchOptions::new().default_field(default_field))
    }
}
