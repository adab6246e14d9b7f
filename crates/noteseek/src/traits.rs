//! The read-only record interface queries are evaluated against.

use std::borrow::Cow;

use serde_json::{Map, Value as JsonValue};

use crate::value::display_title;

/// A document that can be matched by a query.
///
/// The engine only reads these fields, once per evaluation. Records are
/// owned and populated by the host application.
///
/// # Example
///
/// ```
/// use noteseek::Record;
/// use serde_json::{Map, Value};
///
/// struct Page {
///     path: String,
///     body: String,
/// }
///
/// impl Record for Page {
///     fn content(&self) -> &str {
///         &self.body
///     }
///     fn title(&self) -> Option<&str> {
///         None
///     }
///     fn path(&self) -> &str {
///         &self.path
///     }
///     fn frontmatter(&self) -> Option<&Map<String, Value>> {
///         None
///     }
///     fn tags(&self) -> &[String] {
///         &[]
///     }
///     fn references(&self) -> Option<&[String]> {
///         None
///     }
/// }
///
/// let page = Page { path: "notes/Daily Log.md".into(), body: String::new() };
/// assert_eq!(page.display_title(), "Daily Log");
/// ```
pub trait Record {
    /// Body text.
    fn content(&self) -> &str;

    /// Explicit title, if one is set.
    fn title(&self) -> Option<&str>;

    /// Path of the record in its store.
    fn path(&self) -> &str;

    /// Key/value metadata.
    fn frontmatter(&self) -> Option<&Map<String, JsonValue>>;

    /// Tags, lowercase and without a leading `#`.
    fn tags(&self) -> &[String];

    /// Outgoing reference identifiers.
    fn references(&self) -> Option<&[String]>;

    /// Any other named attribute, rendered as a string.
    ///
    /// Consulted for field keys the engine has no dedicated handling for.
    fn attribute(&self, _name: &str) -> Option<Cow<'_, str>> {
        None
    }

    /// The explicit title if non-empty, otherwise the last path segment
    /// without its extension.
    fn display_title(&self) -> Cow<'_, str> {
        display_title(self.title(), self.path())
    }
}
