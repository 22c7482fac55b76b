//! Formatting vocabulary: block styles, alignments, lists, inline styles.
//!
//! [`FormatState`] is the derived, never-persisted snapshot of which toggles
//! are active at the current selection. Exactly one [`BlockStyle`] and one
//! [`Alignment`] hold at a time; inline styles and the list kind are
//! independent of each other.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Block-level style of the element enclosing the selection.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockStyle {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Blockquote,
    /// A block container that is none of the above (`div`, `li`).
    Generic,
}

impl BlockStyle {
    /// Heading style for a level, clamped into 1..=4.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => BlockStyle::Heading1,
            2 => BlockStyle::Heading2,
            3 => BlockStyle::Heading3,
            _ => BlockStyle::Heading4,
        }
    }

    /// Classify an element tag name. `None` for inline or unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "p" => Some(BlockStyle::Paragraph),
            "h1" => Some(BlockStyle::Heading1),
            "h2" => Some(BlockStyle::Heading2),
            "h3" => Some(BlockStyle::Heading3),
            "h4" => Some(BlockStyle::Heading4),
            "blockquote" => Some(BlockStyle::Blockquote),
            "div" | "li" => Some(BlockStyle::Generic),
            _ => None,
        }
    }

    /// Tag passed to the format-block command to apply this style.
    pub fn format_tag(&self) -> &'static str {
        match self {
            BlockStyle::Paragraph | BlockStyle::Generic => "p",
            BlockStyle::Heading1 => "h1",
            BlockStyle::Heading2 => "h2",
            BlockStyle::Heading3 => "h3",
            BlockStyle::Heading4 => "h4",
            BlockStyle::Blockquote => "blockquote",
        }
    }
}

/// Paragraph alignment.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Classify a computed `text-align` value. Logical values map to their
    /// left-to-right physical side.
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" | "-webkit-center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Active list type at the selection.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    #[default]
    None,
    Bullet,
    Numbered,
}

/// Independently toggled inline styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Subscript,
    Superscript,
}

impl InlineStyle {
    pub const ALL: [InlineStyle; 6] = [
        InlineStyle::Bold,
        InlineStyle::Italic,
        InlineStyle::Underline,
        InlineStyle::Strikethrough,
        InlineStyle::Subscript,
        InlineStyle::Superscript,
    ];
}

/// Snapshot of the formatting active at a block's selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub subscript: bool,
    pub superscript: bool,
    pub block: BlockStyle,
    pub list: ListKind,
    pub alignment: Alignment,
    /// Selection or caret sits inside a link.
    pub in_link: bool,
}

impl FormatState {
    pub fn is_active(&self, style: InlineStyle) -> bool {
        match style {
            InlineStyle::Bold => self.bold,
            InlineStyle::Italic => self.italic,
            InlineStyle::Underline => self.underline,
            InlineStyle::Strikethrough => self.strikethrough,
            InlineStyle::Subscript => self.subscript,
            InlineStyle::Superscript => self.superscript,
        }
    }

    pub fn set_inline(&mut self, style: InlineStyle, on: bool) {
        let slot = match style {
            InlineStyle::Bold => &mut self.bold,
            InlineStyle::Italic => &mut self.italic,
            InlineStyle::Underline => &mut self.underline,
            InlineStyle::Strikethrough => &mut self.strikethrough,
            InlineStyle::Subscript => &mut self.subscript,
            InlineStyle::Superscript => &mut self.superscript,
        };
        *slot = on;
    }

    /// Inline styles currently on, in declaration order.
    pub fn active_inline(&self) -> Vec<InlineStyle> {
        InlineStyle::ALL
            .into_iter()
            .filter(|s| self.is_active(*s))
            .collect()
    }
}
