//! The block: one independently editable rich-text fragment.

use serde::{Deserialize, Serialize};

use crate::html::normalize_content;
use crate::ids::BlockId;

/// Markup for an empty block: a single paragraph holding a line break.
///
/// A block's content is never the empty string or a bare line break; both are
/// normalized to this placeholder so the editable region always has a
/// paragraph for the caret to land in.
pub const EMPTY_PARAGRAPH: &str = "<p><br/></p>";

/// A block in the manager's ordered sequence.
///
/// `id` is internal-only: it is stable for the lifetime of the block and is
/// dropped when the sequence is collapsed into a [`Document`](crate::Document).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub content: String,
}

impl Block {
    /// Create a block, normalizing empty content to [`EMPTY_PARAGRAPH`].
    pub fn new(id: BlockId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: normalize_content(&content.into()),
        }
    }

    /// Create an empty-paragraph block.
    pub fn placeholder(id: BlockId) -> Self {
        Self {
            id,
            content: EMPTY_PARAGRAPH.to_string(),
        }
    }

    /// Whether this block holds only the empty-paragraph placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.content == EMPTY_PARAGRAPH
    }

    /// Replace the content, keeping the placeholder invariant.
    pub fn set_content(&mut self, content: &str) {
        self.content = normalize_content(content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_empty_content() {
        let id = BlockId::from_seq(1);
        assert!(Block::new(id, "").is_placeholder());
        assert!(Block::new(id, "   ").is_placeholder());
        assert!(Block::new(id, "<br>").is_placeholder());
        assert_eq!(Block::new(id, "<p>Hi</p>").content, "<p>Hi</p>");
    }

    #[test]
    fn test_set_content_keeps_invariant() {
        let mut block = Block::new(BlockId::from_seq(1), "<p>Hi</p>");
        block.set_content("<br/>");
        assert!(block.is_placeholder());
        block.set_content("<h1>Title</h1>");
        assert_eq!(block.content, "<h1>Title</h1>");
    }
}
