//! Term and clause types produced by the parser.
//!
//! A [`Term`] is one atomic comparison. A [`Clause`] is a conjunction of
//! terms, and a query is a disjunction of clauses.

use serde::{Deserialize, Serialize};

use crate::field::{DEFAULT_KEY, PROPERTY_KEY};

/// A single comparison: field key, operand, negation.
///
/// `key` is always lowercase. `value` is already unquoted and unescaped; it
/// may encode a regex literal (`/pattern/flags`) or, for the `prop` key, a
/// serialized [`PropertyFilter`].
///
/// # Example
///
/// ```
/// use noteseek::Term;
///
/// let term = Term::new("Title", "daily note");
/// assert_eq!(term.key, "title");
/// assert!(!term.negated);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Lowercase field key, or `"default"` for bare terms.
    pub key: String,
    /// Raw operand text.
    pub value: String,
    /// Whether the result of the comparison is inverted.
    #[serde(default)]
    pub negated: bool,
}

impl Term {
    /// Creates a term with a case-folded key.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Term {
            key: key.into().to_lowercase(),
            value: value.into(),
            negated: false,
        }
    }

    /// Creates a term under the default key.
    pub fn bare(value: impl Into<String>) -> Self {
        Term::new(DEFAULT_KEY, value)
    }

    /// Creates a property filter term.
    pub fn property(filter: &PropertyFilter) -> Self {
        Term::new(PROPERTY_KEY, filter.encode())
    }

    /// Returns this term with the given negation flag.
    pub fn negate(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Returns `true` if this term targets the default field.
    pub fn is_bare(&self) -> bool {
        self.key == DEFAULT_KEY
    }
}

/// A conjunction of terms: every term must hold.
pub type Clause = Vec<Term>;

/// Payload of a `[name]` or `[name: expr]` property filter.
///
/// When `expr` is absent the filter only checks that the property exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
}

impl PropertyFilter {
    pub fn new(name: impl Into<String>, expr: Option<String>) -> Self {
        PropertyFilter {
            name: name.into(),
            expr,
        }
    }

    /// Serializes the filter into a term value.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Reads a filter back from a term value.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_keys_are_lowercased() {
        assert_eq!(Term::new("TITLE", "x").key, "title");
        assert_eq!(Term::bare("x").key, "default");
        assert!(Term::bare("x").is_bare());
    }

    #[test]
    fn term_negate() {
        let term = Term::bare("beta").negate(true);
        assert!(term.negated);
        assert_eq!(term.value, "beta");
    }

    #[test]
    fn property_filter_omits_missing_expr() {
        let filter = PropertyFilter::new("status", None);
        assert_eq!(filter.encode(), r#"{"name":"status"}"#);

        let filter = PropertyFilter::new("status", Some("active".into()));
        assert_eq!(filter.encode(), r#"{"name":"status","expr":"active"}"#);
    }

    #[test]
    fn property_filter_decode() {
        let filter = PropertyFilter::decode(r#"{"name":"status","expr":"a b"}"#).unwrap();
        assert_eq!(filter.name, "status");
        assert_eq!(filter.expr.as_deref(), Some("a b"));

        assert_eq!(PropertyFilter::decode("not json"), None);
        assert_eq!(PropertyFilter::decode(r#"{"expr":"x"}"#), None);
    }

    #[test]
    fn property_term() {
        let term = Term::property(&PropertyFilter::new("due", None));
        assert_eq!(term.key, "prop");
        assert_eq!(term.value, r#"{"name":"due"}"#);
    }

    #[test]
    fn term_deserializes_without_negated() {
        let term: Term = serde_json::from_str(r#"{"key":"tag","value":"work"}"#).unwrap();
        assert_eq!(term, Term::new("tag", "work"));
    }
}
