//! Compiled predicates.
//!
//! Compilation resolves each term's field, compiles regex literals and
//! parses nested property expressions once, so that matching a large set of
//! records does no repeated parsing.

use crate::clause::{Clause, PropertyFilter, Term};
use crate::field::Field;
use crate::note::normalize_tag;
use crate::options::SearchOptions;
use crate::pattern::{Pattern, RegexLiteral};
use crate::query::Query;
use crate::traits::Record;
use crate::value::flatten_value;

/// A compiled query, testable against any [`Record`].
///
/// A record matches if every term of at least one clause holds. Matching is
/// pure: the same record always yields the same answer, and a predicate can
/// be shared across threads.
///
/// # Example
///
/// ```
/// use noteseek::{Note, Query, SearchOptions};
///
/// let notes = vec![
///     Note::new("a.md").with_content("project alpha update"),
///     Note::new("b.md").with_content("project beta"),
/// ];
///
/// let predicate = Query::parse("project -alpha")
///     .unwrap()
///     .compile(&SearchOptions::default());
///
/// let hits = predicate.filter(&notes);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].path, "b.md");
/// ```
#[derive(Debug, Clone)]
pub struct Predicate {
    clauses: Vec<Vec<CompiledTerm>>,
}

impl Predicate {
    /// Compiles clauses. Bare terms are tested against the configured
    /// default field.
    pub fn new(clauses: &[Clause], options: &SearchOptions) -> Self {
        let default_field = options.resolved_default_field();
        let clauses = clauses
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|term| CompiledTerm::new(term, &default_field, options))
                    .collect()
            })
            .collect();
        Predicate { clauses }
    }

    /// Returns `true` if every record matches.
    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty() || self.clauses.iter().any(Vec::is_empty)
    }

    /// Tests a single record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.is_match_all()
            || self
                .clauses
                .iter()
                .any(|clause| clause.iter().all(|term| term.matches(record)))
    }

    /// Returns references to the matching records, in input order.
    pub fn filter<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }

    /// Keeps only matching records.
    pub fn filter_mut<R: Record>(&self, records: &mut Vec<R>) {
        records.retain(|r| self.matches(r));
    }

    /// Counts the matching records.
    pub fn count<R: Record>(&self, records: &[R]) -> usize {
        records.iter().filter(|r| self.matches(*r)).count()
    }

    /// Returns the first matching record.
    pub fn find<'a, R: Record>(&self, records: &'a [R]) -> Option<&'a R> {
        records.iter().find(|r| self.matches(*r))
    }

    /// Returns `true` if any record matches.
    pub fn any<R: Record>(&self, records: &[R]) -> bool {
        records.iter().any(|r| self.matches(r))
    }
}

#[derive(Debug, Clone)]
struct CompiledTerm {
    test: TermTest,
    negated: bool,
}

#[derive(Debug, Clone)]
enum TermTest {
    /// Empty operand: always true, even when negated.
    Neutral,
    Text(TextSource, Pattern),
    Tag(TagTest),
    Property(PropertyTest),
    /// Malformed payload: never true.
    Invalid,
}

/// Where a text pattern is applied.
#[derive(Debug, Clone)]
enum TextSource {
    Content,
    Title,
    Path,
    References,
    ContentOrTitle,
    Attribute(String),
}

impl CompiledTerm {
    fn new(term: &Term, default_field: &Field, options: &SearchOptions) -> Self {
        let field = match Field::from_key(&term.key) {
            Field::Default => default_field.clone(),
            field => field,
        };

        let value = term.value.as_str();
        let test = match field {
            Field::Property => PropertyTest::compile(value, options),
            _ if value.trim().is_empty() => TermTest::Neutral,
            Field::Tag => TermTest::Tag(TagTest::new(value)),
            Field::Content => TermTest::Text(TextSource::Content, Pattern::new(value)),
            Field::Title => TermTest::Text(TextSource::Title, Pattern::new(value)),
            Field::Path => TermTest::Text(TextSource::Path, Pattern::new(value)),
            Field::References => TermTest::Text(TextSource::References, Pattern::new(value)),
            Field::Default => TermTest::Text(TextSource::ContentOrTitle, Pattern::new(value)),
            Field::Other(name) => TermTest::Text(TextSource::Attribute(name), Pattern::new(value)),
        };

        CompiledTerm {
            test,
            negated: term.negated,
        }
    }

    fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let hit = match &self.test {
            TermTest::Neutral => return true,
            TermTest::Text(source, pattern) => source.matches(pattern, record),
            TermTest::Tag(tag) => tag.matches(record.tags()),
            TermTest::Property(property) => property.matches(record),
            TermTest::Invalid => false,
        };
        hit != self.negated
    }
}

impl TextSource {
    fn matches<R: Record + ?Sized>(&self, pattern: &Pattern, record: &R) -> bool {
        match self {
            TextSource::Content => pattern.is_match(record.content()),
            TextSource::Title => pattern.is_match(&record.display_title()),
            TextSource::Path => pattern.is_match(record.path()),
            TextSource::References => record
                .references()
                .is_some_and(|refs| refs.iter().any(|r| pattern.is_match(r))),
            TextSource::ContentOrTitle => {
                pattern.is_match(record.content()) || pattern.is_match(&record.display_title())
            }
            TextSource::Attribute(name) => record
                .attribute(name)
                .is_some_and(|value| pattern.is_match(&value)),
        }
    }
}

/// Tag matching: hierarchical prefix, or a regex over `tag` and `#tag`.
#[derive(Debug, Clone)]
enum TagTest {
    Hierarchy(String),
    Regex(Pattern),
}

impl TagTest {
    fn new(raw: &str) -> Self {
        if RegexLiteral::parse(raw).is_some() {
            TagTest::Regex(Pattern::new(raw))
        } else {
            TagTest::Hierarchy(normalize_tag(raw))
        }
    }

    fn matches(&self, tags: &[String]) -> bool {
        match self {
            TagTest::Hierarchy(wanted) => tags.iter().any(|tag| {
                tag == wanted
                    || tag
                        .strip_prefix(wanted.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }),
            TagTest::Regex(pattern) => tags
                .iter()
                .any(|tag| pattern.is_match(tag) || pattern.is_match(&format!("#{tag}"))),
        }
    }
}

/// A compiled `[name]` or `[name: expr]` filter.
#[derive(Debug, Clone)]
struct PropertyTest {
    /// Lowercased property name.
    name: String,
    /// Nested expression, or `None` for an existence check.
    expr: Option<Vec<Vec<ValueTerm>>>,
}

impl PropertyTest {
    fn compile(raw: &str, options: &SearchOptions) -> TermTest {
        let Some(filter) = PropertyFilter::decode(raw) else {
            tracing::trace!(payload = raw, "malformed property payload");
            return TermTest::Invalid;
        };

        let name = filter.name.trim();
        if name.is_empty() {
            return TermTest::Neutral;
        }

        let expr = match filter.expr.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(expr) => match Query::parse_with(expr, options) {
                Ok(query) => Some(
                    query
                        .clauses()
                        .iter()
                        .map(|clause| clause.iter().map(ValueTerm::new).collect())
                        .collect(),
                ),
                Err(err) => {
                    tracing::trace!(property = name, expr, error = %err, "unparseable property expression");
                    return TermTest::Invalid;
                }
            },
        };

        TermTest::Property(PropertyTest {
            name: name.to_lowercase(),
            expr,
        })
    }

    fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let Some(value) = record.frontmatter().and_then(|frontmatter| {
            frontmatter
                .iter()
                .find(|(key, _)| key.to_lowercase() == self.name)
                .map(|(_, value)| value)
        }) else {
            return false;
        };

        let Some(clauses) = &self.expr else {
            return true;
        };

        flatten_value(value).iter().any(|candidate| {
            clauses
                .iter()
                .any(|clause| clause.iter().all(|term| term.matches(candidate)))
        })
    }
}

/// A nested term, tested against one stringified property value.
#[derive(Debug, Clone)]
struct ValueTerm {
    pattern: Option<Pattern>,
    negated: bool,
}

impl ValueTerm {
    fn new(term: &Term) -> Self {
        let pattern = (!term.value.trim().is_empty()).then(|| Pattern::new(&term.value));
        ValueTerm {
            pattern,
            negated: term.negated,
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(candidate) != self.negated,
            None => true,
        }
    }
}
