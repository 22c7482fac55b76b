//! Shared block, document, and formatting types for vellum.
//!
//! This crate is the leaf of the workspace: typed IDs, the block and document
//! records exchanged with the surrounding form, the formatting vocabulary used
//! by the editor surface, and the markup helpers that normalize block content.
//! It has **no internal vellum dependencies**.
//!
//! # Data Model
//!
//! ```text
//! Document (Vec<ContentRecord>)      ← owned by the surrounding form
//!     └── expanded on mount into
//! Block { id: BlockId, content }     ← owned by the BlockManager
//!     └── one editor surface each, holding
//!         FormatState (derived)      ← recomputed from the selection
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`BlockId`]       | Stable block identity, never persisted       |
//! | [`EditorId`]      | One mounted editor instance (for logs)       |
//! | [`Block`]         | id + markup fragment                         |
//! | [`ContentRecord`] | `{ content }`, the persisted shape           |
//! | [`Document`]      | Ordered records exchanged with the form      |
//! | [`FormatState`]   | Active toggles for the current selection     |
//! |-------------------|----------------------------------------------|

pub mod block;
pub mod document;
pub mod format;
pub mod html;
pub mod ids;

pub use block::{Block, EMPTY_PARAGRAPH};
pub use document::{ContentRecord, Document, DocumentError};
pub use format::{Alignment, BlockStyle, FormatState, InlineStyle, ListKind};
pub use html::{clean_html, is_html_content_empty, normalize_content, plain_text};
pub use ids::{BlockId, EditorId};
