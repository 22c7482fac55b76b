//! Formatting commands, their toggle rules, the toolbar catalog, and shortcuts.
//!
//! [`FormatCommand`] is what a toolbar button or shortcut asks for.
//! [`plan`] turns it into the native commands to run, given the formatting
//! active at the selection. Mutual exclusion lives here:
//!
//! - heading levels, blockquote, and paragraph are one block style; applying
//!   the active one reverts to paragraph
//! - alignments are exclusive; re-applying the active one reverts to left
//! - subscript and superscript are exclusive; the other is switched off first
//! - link removes an existing link, otherwise prompts for a URL

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use vellum_types::{Alignment, BlockStyle, FormatState, InlineStyle, ListKind};

use crate::host::NativeCommand;

/// A user-facing formatting command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Subscript,
    Superscript,
    /// Heading level 1..=4. Use [`FormatCommand::heading`] to clamp.
    Heading(u8),
    Paragraph,
    Quote,
    BulletList,
    NumberedList,
    Link,
    AlignLeft,
    AlignCenter,
    AlignRight,
    AlignJustify,
    Indent,
    Outdent,
    HorizontalRule,
    ClearFormatting,
    Undo,
    Redo,
}

impl FormatCommand {
    /// Heading command with the level clamped into 1..=4.
    pub fn heading(level: u8) -> Self {
        FormatCommand::Heading(level.clamp(1, 4))
    }

    pub fn inline_style(&self) -> Option<InlineStyle> {
        match self {
            FormatCommand::Bold => Some(InlineStyle::Bold),
            FormatCommand::Italic => Some(InlineStyle::Italic),
            FormatCommand::Underline => Some(InlineStyle::Underline),
            FormatCommand::Strikethrough => Some(InlineStyle::Strikethrough),
            FormatCommand::Subscript => Some(InlineStyle::Subscript),
            FormatCommand::Superscript => Some(InlineStyle::Superscript),
            _ => None,
        }
    }

    pub fn alignment(&self) -> Option<Alignment> {
        match self {
            FormatCommand::AlignLeft => Some(Alignment::Left),
            FormatCommand::AlignCenter => Some(Alignment::Center),
            FormatCommand::AlignRight => Some(Alignment::Right),
            FormatCommand::AlignJustify => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// What applying a command amounts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandPlan {
    /// Run these native commands in order.
    Execute(Vec<NativeCommand>),
    /// Selection is inside a link: remove it, no prompt.
    Unlink,
    /// Ask for a URL, then wrap the selection in a link to it.
    PromptForLink,
}

fn justify(alignment: Alignment) -> NativeCommand {
    match alignment {
        Alignment::Left => NativeCommand::JustifyLeft,
        Alignment::Center => NativeCommand::JustifyCenter,
        Alignment::Right => NativeCommand::JustifyRight,
        Alignment::Justify => NativeCommand::JustifyFull,
    }
}

fn toggle_block(style: BlockStyle, state: &FormatState) -> NativeCommand {
    if state.block == style {
        NativeCommand::FormatBlock(BlockStyle::Paragraph)
    } else {
        NativeCommand::FormatBlock(style)
    }
}

/// Resolve a command against the formatting active at the selection.
pub fn plan(command: FormatCommand, state: &FormatState) -> CommandPlan {
    use NativeCommand as N;

    let natives = match command {
        FormatCommand::Link => {
            return if state.in_link {
                CommandPlan::Unlink
            } else {
                CommandPlan::PromptForLink
            };
        }
        FormatCommand::Subscript if state.superscript => vec![N::Superscript, N::Subscript],
        FormatCommand::Superscript if state.subscript => vec![N::Subscript, N::Superscript],
        FormatCommand::Bold => vec![N::Bold],
        FormatCommand::Italic => vec![N::Italic],
        FormatCommand::Underline => vec![N::Underline],
        FormatCommand::Strikethrough => vec![N::StrikeThrough],
        FormatCommand::Subscript => vec![N::Subscript],
        FormatCommand::Superscript => vec![N::Superscript],
        FormatCommand::Heading(level) => vec![toggle_block(BlockStyle::heading(level), state)],
        FormatCommand::Quote => vec![toggle_block(BlockStyle::Blockquote, state)],
        FormatCommand::Paragraph => vec![N::FormatBlock(BlockStyle::Paragraph)],
        FormatCommand::BulletList => vec![N::InsertUnorderedList],
        FormatCommand::NumberedList => vec![N::InsertOrderedList],
        FormatCommand::AlignLeft => vec![N::JustifyLeft],
        FormatCommand::AlignCenter | FormatCommand::AlignRight | FormatCommand::AlignJustify => {
            let wanted = command.alignment().unwrap_or_default();
            if state.alignment == wanted {
                vec![N::JustifyLeft]
            } else {
                vec![justify(wanted)]
            }
        }
        FormatCommand::Indent => vec![N::Indent],
        FormatCommand::Outdent => vec![N::Outdent],
        FormatCommand::HorizontalRule => vec![N::InsertHorizontalRule],
        FormatCommand::ClearFormatting => {
            vec![N::RemoveFormat, N::FormatBlock(BlockStyle::Paragraph)]
        }
        FormatCommand::Undo => vec![N::Undo],
        FormatCommand::Redo => vec![N::Redo],
    };
    CommandPlan::Execute(natives)
}

// ============================================================================
// Toolbar catalog
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ToolbarGroup {
    Text,
    Script,
    Heading,
    List,
    Format,
    Align,
    Indent,
}

/// One toolbar button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolbarButton {
    pub key: &'static str,
    pub label: &'static str,
    pub title: &'static str,
    pub command: FormatCommand,
    pub group: ToolbarGroup,
}

impl ToolbarButton {
    /// Whether the button renders as active for this formatting state.
    pub fn is_lit(&self, state: &FormatState) -> bool {
        if let Some(style) = self.command.inline_style() {
            return state.is_active(style);
        }
        if let Some(alignment) = self.command.alignment() {
            return state.alignment == alignment;
        }
        match self.command {
            FormatCommand::Heading(level) => state.block == BlockStyle::heading(level),
            FormatCommand::Paragraph => state.block == BlockStyle::Paragraph,
            FormatCommand::Quote => state.block == BlockStyle::Blockquote,
            FormatCommand::BulletList => state.list == ListKind::Bullet,
            FormatCommand::NumberedList => state.list == ListKind::Numbered,
            FormatCommand::Link => state.in_link,
            _ => false,
        }
    }
}

const fn button(
    key: &'static str,
    label: &'static str,
    title: &'static str,
    command: FormatCommand,
    group: ToolbarGroup,
) -> ToolbarButton {
    ToolbarButton {
        key,
        label,
        title,
        command,
        group,
    }
}

/// Formatting buttons in display order.
pub const TOOLBAR: &[ToolbarButton] = &[
    button("bold", "B", "Bold", FormatCommand::Bold, ToolbarGroup::Text),
    button("italic", "I", "Italic", FormatCommand::Italic, ToolbarGroup::Text),
    button("underline", "U", "Underline", FormatCommand::Underline, ToolbarGroup::Text),
    button("strikethrough", "S", "Strikethrough", FormatCommand::Strikethrough, ToolbarGroup::Text),
    button("subscript", "X₂", "Subscript", FormatCommand::Subscript, ToolbarGroup::Script),
    button("superscript", "X²", "Superscript", FormatCommand::Superscript, ToolbarGroup::Script),
    button("h1", "H1", "Heading 1", FormatCommand::Heading(1), ToolbarGroup::Heading),
    button("h2", "H2", "Heading 2", FormatCommand::Heading(2), ToolbarGroup::Heading),
    button("h3", "H3", "Heading 3", FormatCommand::Heading(3), ToolbarGroup::Heading),
    button("h4", "H4", "Heading 4", FormatCommand::Heading(4), ToolbarGroup::Heading),
    button("p", "P", "Paragraph", FormatCommand::Paragraph, ToolbarGroup::Heading),
    button("ul", "• List", "Bullet List", FormatCommand::BulletList, ToolbarGroup::List),
    button("ol", "1. List", "Numbered List", FormatCommand::NumberedList, ToolbarGroup::List),
    button("quote", "❝", "Quote", FormatCommand::Quote, ToolbarGroup::Format),
    button("link", "🔗", "Link", FormatCommand::Link, ToolbarGroup::Format),
    button("alignLeft", "⬅", "Align Left", FormatCommand::AlignLeft, ToolbarGroup::Align),
    button("alignCenter", "⬌", "Align Center", FormatCommand::AlignCenter, ToolbarGroup::Align),
    button("alignRight", "➡", "Align Right", FormatCommand::AlignRight, ToolbarGroup::Align),
    button("alignJustify", "⬍", "Justify", FormatCommand::AlignJustify, ToolbarGroup::Align),
    button("indent", "→", "Indent", FormatCommand::Indent, ToolbarGroup::Indent),
    button("outdent", "←", "Outdent", FormatCommand::Outdent, ToolbarGroup::Indent),
    button("hr", "—", "Horizontal Rule", FormatCommand::HorizontalRule, ToolbarGroup::Format),
];

/// Buttons outside the formatting catalog, shown beside the block controls.
pub const HISTORY_BUTTONS: &[ToolbarButton] = &[
    button("undo", "↶", "Undo (Ctrl+Z)", FormatCommand::Undo, ToolbarGroup::Format),
    button("redo", "↷", "Redo (Ctrl+Y)", FormatCommand::Redo, ToolbarGroup::Format),
    button("clear", "✕", "Clear Formatting", FormatCommand::ClearFormatting, ToolbarGroup::Format),
];

// ============================================================================
// Keyboard shortcuts
// ============================================================================

/// A key press with its modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
            shift: false,
        }
    }

    pub fn meta(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            meta: true,
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Map a chord to a command. Only Ctrl/Cmd chords are shortcuts.
///
/// | Chord             | Command     |
/// |-------------------|-------------|
/// | Ctrl+Z            | Undo        |
/// | Ctrl+Y, Ctrl+⇧Z   | Redo        |
/// | Ctrl+E            | AlignCenter |
/// | Ctrl+L            | AlignLeft   |
/// | Ctrl+R            | AlignRight  |
pub fn shortcut(chord: &KeyChord) -> Option<FormatCommand> {
    if !(chord.ctrl || chord.meta) {
        return None;
    }
    match (chord.key.to_ascii_lowercase(), chord.shift) {
        ('z', false) => Some(FormatCommand::Undo),
        ('z', true) | ('y', _) => Some(FormatCommand::Redo),
        ('e', _) => Some(FormatCommand::AlignCenter),
        ('l', _) => Some(FormatCommand::AlignLeft),
        ('r', _) => Some(FormatCommand::AlignRight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FormatState {
        FormatState::default()
    }

    fn exec(natives: Vec<NativeCommand>) -> CommandPlan {
        CommandPlan::Execute(natives)
    }

    #[test]
    fn test_heading_toggles_back_to_paragraph() {
        let mut s = state();
        assert_eq!(
            plan(FormatCommand::Heading(1), &s),
            exec(vec![NativeCommand::FormatBlock(BlockStyle::Heading1)])
        );

        s.block = BlockStyle::Heading1;
        assert_eq!(
            plan(FormatCommand::Heading(1), &s),
            exec(vec![NativeCommand::FormatBlock(BlockStyle::Paragraph)])
        );
        // A different level replaces the active one
        assert_eq!(
            plan(FormatCommand::Heading(3), &s),
            exec(vec![NativeCommand::FormatBlock(BlockStyle::Heading3)])
        );
    }

    #[test]
    fn test_quote_toggles() {
        let mut s = state();
        s.block = BlockStyle::Blockquote;
        assert_eq!(
            plan(FormatCommand::Quote, &s),
            exec(vec![NativeCommand::FormatBlock(BlockStyle::Paragraph)])
        );
        s.block = BlockStyle::Heading2;
        assert_eq!(
            plan(FormatCommand::Quote, &s),
            exec(vec![NativeCommand::FormatBlock(BlockStyle::Blockquote)])
        );
    }

    #[test]
    fn test_alignment_reverts_to_left() {
        let mut s = state();
        s.alignment = Alignment::Right;
        assert_eq!(plan(FormatCommand::AlignRight, &s), exec(vec![NativeCommand::JustifyLeft]));
        assert_eq!(plan(FormatCommand::AlignLeft, &s), exec(vec![NativeCommand::JustifyLeft]));
        assert_eq!(plan(FormatCommand::AlignCenter, &s), exec(vec![NativeCommand::JustifyCenter]));

        s.alignment = Alignment::Justify;
        assert_eq!(plan(FormatCommand::AlignJustify, &s), exec(vec![NativeCommand::JustifyLeft]));
    }

    #[test]
    fn test_scripts_are_exclusive() {
        let mut s = state();
        s.superscript = true;
        assert_eq!(
            plan(FormatCommand::Subscript, &s),
            exec(vec![NativeCommand::Superscript, NativeCommand::Subscript])
        );

        let mut s = state();
        s.subscript = true;
        assert_eq!(
            plan(FormatCommand::Superscript, &s),
            exec(vec![NativeCommand::Subscript, NativeCommand::Superscript])
        );
        assert_eq!(plan(FormatCommand::Subscript, &s), exec(vec![NativeCommand::Subscript]));
    }

    #[test]
    fn test_link_plan_depends_on_selection() {
        let mut s = state();
        assert_eq!(plan(FormatCommand::Link, &s), CommandPlan::PromptForLink);
        s.in_link = true;
        assert_eq!(plan(FormatCommand::Link, &s), CommandPlan::Unlink);
    }

    #[test]
    fn test_clear_formatting_resets_block() {
        assert_eq!(
            plan(FormatCommand::ClearFormatting, &state()),
            exec(vec![
                NativeCommand::RemoveFormat,
                NativeCommand::FormatBlock(BlockStyle::Paragraph)
            ])
        );
    }

    #[test]
    fn test_toolbar_lit_state() {
        let mut s = state();
        s.bold = true;
        s.block = BlockStyle::Heading2;
        s.alignment = Alignment::Center;
        s.list = ListKind::Numbered;

        let lit: Vec<&str> = TOOLBAR.iter().filter(|b| b.is_lit(&s)).map(|b| b.key).collect();
        assert_eq!(lit, vec!["bold", "h2", "ol", "alignCenter"]);
    }

    #[test]
    fn test_toolbar_keys_unique() {
        let mut keys: Vec<&str> = TOOLBAR.iter().chain(HISTORY_BUTTONS).map(|b| b.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), TOOLBAR.len() + HISTORY_BUTTONS.len());
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(shortcut(&KeyChord::ctrl('z')), Some(FormatCommand::Undo));
        assert_eq!(shortcut(&KeyChord::meta('Z').with_shift()), Some(FormatCommand::Redo));
        assert_eq!(shortcut(&KeyChord::ctrl('y')), Some(FormatCommand::Redo));
        assert_eq!(shortcut(&KeyChord::ctrl('e')), Some(FormatCommand::AlignCenter));
        assert_eq!(shortcut(&KeyChord::ctrl('l')), Some(FormatCommand::AlignLeft));
        assert_eq!(shortcut(&KeyChord::meta('r')), Some(FormatCommand::AlignRight));
        assert_eq!(shortcut(&KeyChord::ctrl('b')), None);

        let plain = KeyChord {
            key: 'z',
            ctrl: false,
            meta: false,
            shift: false,
        };
        assert_eq!(shortcut(&plain), None);
    }

    #[test]
    fn test_heading_constructor_clamps() {
        assert_eq!(FormatCommand::heading(0), FormatCommand::Heading(1));
        assert_eq!(FormatCommand::heading(6), FormatCommand::Heading(4));
    }
}
