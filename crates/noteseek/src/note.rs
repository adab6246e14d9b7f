//! An owned [`Record`] implementation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::traits::Record;

/// A note with the fields the query engine reads.
///
/// Notes deserialize from JSON or YAML, so fixtures and caches can be loaded
/// directly. Tags passed through [`Note::with_tags`] are normalized.
///
/// # Example
///
/// ```
/// use noteseek::{Note, Record};
///
/// let note = Note::new("projects/Alpha.md")
///     .with_content("project alpha update")
///     .with_tags(["#Work", "work/project"]);
///
/// assert_eq!(note.display_title(), "Alpha");
/// assert_eq!(note.tags(), ["work", "work/project"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub frontmatter: Option<Map<String, JsonValue>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub references: Option<Vec<String>>,
    /// Extra attributes reachable through unrecognized field keys.
    #[serde(default)]
    pub attributes: BTreeMap<String, JsonValue>,
}

impl Note {
    pub fn new(path: impl Into<String>) -> Self {
        Note {
            path: path.into(),
            ..Note::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets tags, lowercasing them and dropping a leading `#`.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags.into_iter().map(|t| normalize_tag(t.as_ref())).collect();
        self
    }

    /// Sets frontmatter from a JSON object. Non-object values clear it.
    pub fn with_frontmatter(mut self, frontmatter: JsonValue) -> Self {
        self.frontmatter = match frontmatter {
            JsonValue::Object(map) => Some(map),
            _ => None,
        };
        self
    }

    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = Some(references.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Lowercases a tag and strips one leading `#`.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim();
    tag.strip_prefix('#').unwrap_or(tag).to_lowercase()
}

impl Record for Note {
    fn content(&self) -> &str {
        &self.content
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn frontmatter(&self) -> Option<&Map<String, JsonValue>> {
        self.frontmatter.as_ref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn references(&self) -> Option<&[String]> {
        self.references.as_deref()
    }

    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.attributes.get(name) {
            return Some(match value {
                JsonValue::String(s) => Cow::Borrowed(s.as_str()),
                other => Cow::Owned(other.to_string()),
            });
        }
        match name {
            "tags" => Some(Cow::Owned(self.tags.join(","))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_tags() {
        assert_eq!(normalize_tag("#Work/Project"), "work/project");
        assert_eq!(normalize_tag("##x"), "#x");
        assert_eq!(normalize_tag(" home "), "home");
    }

    #[test]
    fn frontmatter_must_be_an_object() {
        let note = Note::new("a.md").with_frontmatter(json!({"status": "Active"}));
        assert_eq!(
            note.frontmatter().and_then(|m| m.get("status")),
            Some(&json!("Active"))
        );

        let note = Note::new("a.md").with_frontmatter(json!(["x"]));
        assert!(note.frontmatter().is_none());
    }

    #[test]
    fn attributes() {
        let note = Note::new("a.md")
            .with_tags(["a", "b"])
            .with_attribute("folder", "projects")
            .with_attribute("words", 120);

        assert_eq!(note.attribute("folder").as_deref(), Some("projects"));
        assert_eq!(note.attribute("words").as_deref(), Some("120"));
        assert_eq!(note.attribute("tags").as_deref(), Some("a,b"));
        assert_eq!(note.attribute("missing"), None);
    }

    #[test]
    fn deserialize_partial() {
        let note: Note = serde_json::from_str(r#"{"path": "x.md", "content": "hi"}"#).unwrap();
        assert_eq!(note.path, "x.md");
        assert_eq!(note.content, "hi");
        assert!(note.references().is_none());
    }
}
