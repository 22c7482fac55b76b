//! The serialized document exchanged with the surrounding form.
//!
//! A `Document` is an ordered sequence of `{ "content": "..." }` records. It is
//! what the form loads, what the editor emits after a quiet period, and what
//! the form eventually sends to the save endpoint. Block IDs never appear here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::html::{clean_html, is_html_content_empty};

/// Errors from decoding a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One persisted content fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(default)]
    pub content: String,
}

impl ContentRecord {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Ordered content fragments, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(pub Vec<ContentRecord>);

impl Document {
    /// An empty document (no fragments).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Decode from the JSON array form (`[{"content": "..."}]`).
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode to the JSON array form.
    pub fn to_json(&self) -> String {
        // Vec<{content: String}> always serializes
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentRecord> {
        self.0.iter()
    }

    /// Fragment contents in order.
    pub fn contents(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.content.as_str()).collect()
    }

    /// All fragments concatenated in order.
    pub fn to_html(&self) -> String {
        self.0.iter().map(|r| r.content.as_str()).collect()
    }

    /// Concatenated fragments after [`clean_html`]. Empty when nothing visible remains.
    pub fn cleaned_html(&self) -> String {
        clean_html(&self.to_html())
    }

    /// True when no fragment carries visible text.
    ///
    /// A document of placeholder blocks is "empty" in this sense even though
    /// it always has at least one block.
    pub fn is_empty_content(&self) -> bool {
        is_html_content_empty(&self.cleaned_html())
    }
}

impl From<Vec<ContentRecord>> for Document {
    fn from(records: Vec<ContentRecord>) -> Self {
        Self(records)
    }
}

impl<'a> From<Vec<&'a str>> for Document {
    fn from(contents: Vec<&'a str>) -> Self {
        Self(contents.into_iter().map(ContentRecord::new).collect())
    }
}

impl IntoIterator for Document {
    type Item = ContentRecord;
    type IntoIter = std::vec::IntoIter<ContentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape_has_only_content() {
        let doc = Document::from(vec!["<p><br/></p>", "<p>Hello</p>"]);
        assert_eq!(
            doc.to_json(),
            r#"[{"content":"<p><br/></p>"},{"content":"<p>Hello</p>"}]"#
        );
    }

    #[test]
    fn test_from_json_tolerates_extra_and_missing_fields() {
        let doc = Document::from_json(r#"[{"id":"x","content":"<p>A</p>"},{}]"#).unwrap();
        assert_eq!(doc.contents(), vec!["<p>A</p>", ""]);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Document::from_json("{not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn test_empty_content_detection() {
        let placeholders = Document::from(vec!["<p><br/></p>", "<p><br></p>"]);
        assert!(placeholders.is_empty_content());

        let text = Document::from(vec!["<p><br/></p>", "<p>Hello</p>"]);
        assert!(!text.is_empty_content());
        assert_eq!(text.cleaned_html(), "<p>Hello</p>");
    }
}
