//! The platform seam: a block's editable region and its native commands.
//!
//! Everything browser-shaped lives behind [`RichTextHost`]: running native
//! formatting commands, querying their toggle state, saving and restoring the
//! selection, and reading the region's markup. The surface state machine only
//! talks to this trait, so it runs the same against a real editing surface or
//! the in-memory [`MemoryHost`](crate::memory::MemoryHost).

use strum::AsRefStr;
use vellum_types::{BlockId, BlockStyle, InlineStyle, ListKind};

use crate::error::HostError;

/// A native rich-text command, as understood by the platform executor.
#[derive(Clone, Debug, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum NativeCommand {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    Subscript,
    Superscript,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,
    InsertOrderedList,
    InsertUnorderedList,
    CreateLink(String),
    Unlink,
    RemoveFormat,
    FormatBlock(BlockStyle),
    Indent,
    Outdent,
    InsertHorizontalRule,
    Undo,
    Redo,
}

impl NativeCommand {
    /// Command name for logs, e.g. `formatBlock`.
    pub fn name(&self) -> &str {
        self.as_ref()
    }
}

/// A toggle whose state can be queried at the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandState {
    Inline(InlineStyle),
    List(ListKind),
}

/// One element on the path from the selection anchor up to the region root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementInfo {
    /// Tag name, any case.
    pub tag: String,
    /// Computed `text-align`, when the platform reports one.
    pub text_align: Option<String>,
}

impl ElementInfo {
    pub fn aligned(tag: impl Into<String>, text_align: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text_align: Some(text_align.into()),
        }
    }
}

/// One block's editable region on the platform.
pub trait RichTextHost: Send + 'static {
    /// Opaque saved selection.
    type Selection: Clone + Send + 'static;

    /// Run a native command against the current selection.
    fn exec(&mut self, command: &NativeCommand) -> Result<(), HostError>;

    /// Whether a toggle is on at the current selection.
    fn query_state(&self, state: CommandState) -> bool;

    /// Capture the current selection if it lies inside this region.
    fn capture_selection(&self) -> Option<Self::Selection>;

    /// Make a saved selection current again.
    fn restore_selection(&mut self, selection: &Self::Selection) -> Result<(), HostError>;

    fn focus(&mut self) -> Result<(), HostError>;

    /// Whether focus is inside this region.
    fn has_focus(&self) -> bool;

    fn inner_html(&self) -> String;

    fn set_inner_html(&mut self, html: &str);

    /// Elements from the selection anchor up to, not including, the region
    /// root, innermost first. `None` when there is no selection in the region.
    fn selection_ancestors(&self) -> Option<Vec<ElementInfo>>;

    /// Whether the selection or caret sits inside a link.
    fn selection_in_link(&self) -> bool;
}

/// Creates a host region for each block the editor mounts.
pub trait HostFactory {
    type Host: RichTextHost;

    fn create(&mut self, id: BlockId) -> Self::Host;
}

/// Synchronous URL prompt for the link command.
///
/// `None`, or a blank answer, means the user cancelled.
pub trait UrlPrompt {
    fn prompt_url(&mut self) -> Option<String>;
}

impl<F> UrlPrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn prompt_url(&mut self) -> Option<String> {
        self()
    }
}

/// A prompt for contexts that never create links; always cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl UrlPrompt for NoPrompt {
    fn prompt_url(&mut self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_command_names() {
        assert_eq!(NativeCommand::StrikeThrough.name(), "strikeThrough");
        assert_eq!(NativeCommand::FormatBlock(BlockStyle::Heading1).name(), "formatBlock");
        assert_eq!(NativeCommand::CreateLink("x".into()).name(), "createLink");
        assert_eq!(NativeCommand::InsertHorizontalRule.name(), "insertHorizontalRule");
    }

    #[test]
    fn test_closure_prompt() {
        let mut answers = vec![Some("https://a.example".to_string())];
        let mut prompt = move || answers.pop().flatten();
        assert_eq!(prompt.prompt_url().as_deref(), Some("https://a.example"));
        assert_eq!(prompt.prompt_url(), None);
        assert_eq!(NoPrompt.prompt_url(), None);
    }
}
