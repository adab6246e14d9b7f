//! Field keys a term can target.
//!
//! Term keys are plain lowercase strings so that parsed queries serialize
//! cleanly. The [`Field`] enum is the typed view the evaluator dispatches on.

/// Sentinel key for terms written without an explicit `key:` prefix.
pub const DEFAULT_KEY: &str = "default";

/// Key carried by bracketed property filters.
pub const PROPERTY_KEY: &str = "prop";

/// The record field a term is tested against.
///
/// Several spellings map to the same field:
/// - `title` and `file` both test the display title
/// - `references`, `reference`, `refs` and `ref` all test outgoing references
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    /// Body text.
    Content,
    /// Display title (explicit title or file stem).
    Title,
    /// Raw record path.
    Path,
    /// Hierarchical tags.
    Tag,
    /// Outgoing reference identifiers.
    References,
    /// A `[name: expr]` property filter over frontmatter.
    Property,
    /// Content OR title.
    Default,
    /// Any other named attribute of the record.
    Other(String),
}

impl Field {
    /// Resolves a term key, case-insensitively.
    pub fn from_key(key: &str) -> Field {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "content" => Field::Content,
            "title" | "file" => Field::Title,
            "path" => Field::Path,
            "tag" => Field::Tag,
            "references" | "reference" | "refs" | "ref" => Field::References,
            PROPERTY_KEY => Field::Property,
            DEFAULT_KEY => Field::Default,
            _ => Field::Other(key),
        }
    }

    /// Returns the canonical key for this field.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Content => "content",
            Field::Title => "title",
            Field::Path => "path",
            Field::Tag => "tag",
            Field::References => "references",
            Field::Property => PROPERTY_KEY,
            Field::Default => DEFAULT_KEY,
            Field::Other(key) => key,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
