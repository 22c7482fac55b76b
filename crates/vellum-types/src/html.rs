//! Markup helpers for block content.
//!
//! Block content is a restricted HTML-like fragment produced by the editing
//! surface. These helpers never parse it into a tree; they only apply the
//! textual normalizations the editor and the surrounding form rely on.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::EMPTY_PARAGRAPH;

static EMPTY_PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>\s*<br\s*/?>\s*</p>").expect("static regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

/// Map empty editable-region markup to [`EMPTY_PARAGRAPH`].
///
/// Whitespace-only markup and a bare `<br>` (in any of its spellings) are
/// what a contenteditable region is left with after the user deletes
/// everything. Anything else passes through untouched.
pub fn normalize_content(html: &str) -> String {
    let trimmed = html.trim();
    if trimmed.is_empty() || matches!(trimmed, "<br>" | "<br/>" | "<br />") {
        EMPTY_PARAGRAPH.to_string()
    } else {
        html.to_string()
    }
}

/// Strip every tag, leaving only the text nodes.
pub fn plain_text(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Clean editor markup before it is handed to persistence.
///
/// - `<div>` wrappers (what some engines insert on Enter) become paragraphs
/// - empty `<p><br></p>` paragraphs are dropped
/// - `&nbsp;` becomes a plain space and whitespace runs collapse
///
/// Returns the empty string when no visible text remains.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let replaced = html.replace("<div>", "<p>").replace("</div>", "</p>");
    let without_empty = EMPTY_PARAGRAPH_RE.replace_all(&replaced, "");
    let spaced = without_empty.replace("&nbsp;", " ");
    let collapsed = WHITESPACE_RE.replace_all(&spaced, " ");
    let cleaned = collapsed.trim();

    if plain_text(cleaned).trim().is_empty() {
        return String::new();
    }
    cleaned.to_string()
}

/// True when the markup carries no visible text.
pub fn is_html_content_empty(html: &str) -> bool {
    plain_text(html).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_content() {
        assert_eq!(normalize_content(""), EMPTY_PARAGRAPH);
        assert_eq!(normalize_content(" \n "), EMPTY_PARAGRAPH);
        assert_eq!(normalize_content("<br>"), EMPTY_PARAGRAPH);
        assert_eq!(normalize_content("<br />"), EMPTY_PARAGRAPH);
        assert_eq!(normalize_content("<p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_clean_html_converts_divs_and_drops_empty_paragraphs() {
        let html = "<div>One</div><p><br></p><p>Two&nbsp;&nbsp;words</p>";
        assert_eq!(clean_html(html), "<p>One</p><p>Two words</p>");
    }

    #[test]
    fn test_clean_html_collapses_whitespace() {
        assert_eq!(clean_html("  <p>a\n\n   b</p>  "), "<p>a b</p>");
    }

    #[test]
    fn test_clean_html_returns_empty_without_text() {
        assert_eq!(clean_html("<p><br/></p>"), "");
        assert_eq!(clean_html("<p>&nbsp;</p><hr>"), "");
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn test_is_html_content_empty() {
        assert!(is_html_content_empty("<p><strong> </strong></p>"));
        assert!(!is_html_content_empty("<h2>Heading</h2>"));
    }
}
