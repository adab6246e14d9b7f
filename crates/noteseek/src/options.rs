//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Default cap on the number of clauses a query may normalize into.
pub const DEFAULT_MAX_CLAUSES: usize = 4096;

/// Settings that shape how queries are parsed and evaluated.
///
/// Every field has a default, so partial settings deserialize:
///
/// ```
/// use noteseek::SearchOptions;
///
/// let options: SearchOptions = serde_json::from_str(r#"{"default_field": "Title"}"#).unwrap();
/// assert_eq!(options.default_field, "Title");
/// assert_eq!(options.max_clauses, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Field that bare terms are tested against. Case-insensitive.
    pub default_field: String,
    /// Upper bound on clauses produced by normalization.
    pub max_clauses: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            default_field: "content".to_string(),
            max_clauses: DEFAULT_MAX_CLAUSES,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        SearchOptions::default()
    }

    /// Sets the field bare terms are tested against.
    pub fn default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = field.into();
        self
    }

    /// Sets the clause cap.
    pub fn max_clauses(mut self, n: usize) -> Self {
        self.max_clauses = n;
        self
    }

    /// Resolves the configured default field. A blank setting means content.
    pub fn resolved_default_field(&self) -> Field {
        if self.default_field.trim().is_empty() {
            return Field::Content;
        }
        Field::from_key(&self.default_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.resolved_default_field(), Field::Content);
        assert_eq!(options.max_clauses, DEFAULT_MAX_CLAUSES);
    }

    #[test]
    fn builder() {
        let options = SearchOptions::new().default_field("FILE").max_clauses(10);
        assert_eq!(options.resolved_default_field(), Field::Title);
        assert_eq!(options.max_clauses, 10);
    }

    #[test]
    fn blank_default_field_means_content() {
        assert_eq!(
            SearchOptions::new().default_field("").resolved_default_field(),
            Field::Content
        );
        assert_eq!(
            SearchOptions::new().default_field("  ").resolved_default_field(),
            Field::Content
        );
    }

    #[test]
    fn deserialize_empty() {
        let options: SearchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, SearchOptions::default());
    }
}
