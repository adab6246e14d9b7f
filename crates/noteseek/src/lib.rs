//! Noteseek - a free-text query language for filtering notes.
//!
//! A query string is tokenized, parsed into a boolean expression and
//! normalized into disjunctive normal form: a list of clauses, where a record
//! matches if every term of at least one clause holds. The clause list is
//! then compiled into a [`Predicate`] that can be run over any [`Record`].
//!
//! # Quick Start
//!
//! ```rust
//! use noteseek::{Note, Query, SearchOptions};
//! use serde_json::json;
//!
//! let notes = vec![
//!     Note::new("work/Roadmap.md")
//!         .with_content("Quarterly roadmap for project alpha")
//!         .with_tags(["work/planning"])
//!         .with_frontmatter(json!({"status": "Active"})),
//!     Note::new("home/Groceries.md")
//!         .with_content("milk, eggs")
//!         .with_tags(["home"]),
//! ];
//!
//! let query = Query::parse("tag:work [status: (active OR pending)] alpha").unwrap();
//! let predicate = query.compile(&SearchOptions::default());
//!
//! let hits = predicate.filter(&notes);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].path, "work/Roadmap.md");
//! ```
//!
//! # Query Syntax
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `alpha beta` | both words (AND) |
//! | `alpha OR beta` | either word; AND binds tighter than OR |
//! | `(a OR b) c` | grouping |
//! | `-alpha` | negation of the next term |
//! | `"exact phrase"` | contiguous substring, `\"` escapes a quote |
//! | `key:value`, `key:"two words"` | field filter |
//! | `/pattern/flags` | regex literal instead of substring |
//! | `[name]` | frontmatter property exists |
//! | `[name: expr]` | property value satisfies a nested query |
//!
//! # Fields
//!
//! | Key | Tested against |
//! |-----|----------------|
//! | `content` | body text |
//! | `title`, `file` | explicit title, else file stem |
//! | `path` | raw path |
//! | `tag` | tags, hierarchically (`tag:work` matches `work/project`) |
//! | `references`, `reference`, `refs`, `ref` | outgoing references |
//! | anything else | [`Record::attribute`] |
//!
//! Bare terms use `SearchOptions::default_field`. A term with an empty
//! value, such as a half-typed `title:`, matches everything.
//!
//! # Errors
//!
//! Only parsing can fail, on an unterminated quote or bracket, or when the
//! normal form would exceed [`SearchOptions::max_clauses`]. Evaluation never
//! fails: malformed regexes and property payloads simply do not match.

mod clause;
mod error;
mod field;
mod lexer;
mod note;
mod options;
mod parser;
mod pattern;
mod predicate;
mod query;
mod traits;
mod value;

// Re-export public API
pub use clause::{Clause, PropertyFilter, Term};
pub use error::{QueryError, Result};
pub use field::{Field, DEFAULT_KEY, PROPERTY_KEY};
pub use lexer::{tokenize, Token};
pub use note::{normalize_tag, Note};
pub use options::{SearchOptions, DEFAULT_MAX_CLAUSES};
pub use parser::{parse_tokens, to_dnf, Expr};
pub use pattern::{Pattern, RegexLiteral};
pub use predicate::Predicate;
pub use query::Query;
pub use traits::Record;
pub use value::{display_title, flatten_value};

/// Parses a query string with default options.
///
/// Shorthand for [`Query::parse`].
pub fn parse(input: &str) -> Result<Query> {
    Query::parse(input)
}
