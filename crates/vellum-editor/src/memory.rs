//! In-memory editing host.
//!
//! Used for replay and testing. Models one block's region as a tiny formatting
//! state (block style, alignment, inline toggles, list, link, indent, rules)
//! over plain text, renders it back to markup after every command, and
//! records every native command it receives. All data is ephemeral.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use vellum_types::{Alignment, BlockId, BlockStyle, InlineStyle, ListKind, plain_text};

use crate::error::HostError;
use crate::host::{CommandState, ElementInfo, HostFactory, NativeCommand, RichTextHost, UrlPrompt};

/// Formatting model behind the rendered markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Model {
    text: String,
    block: BlockStyle,
    alignment: Alignment,
    inline: Vec<InlineStyle>,
    list: ListKind,
    link: Option<String>,
    indent: u8,
    rules: usize,
}

impl Model {
    /// Best-effort read of markup written from outside.
    fn from_html(html: &str) -> Self {
        let lower = html.to_ascii_lowercase();
        let first_tag: String = lower
            .trim_start()
            .strip_prefix('<')
            .map(|rest| rest.chars().take_while(|c| c.is_ascii_alphanumeric()).collect())
            .unwrap_or_default();

        let list = match first_tag.as_str() {
            "ul" => ListKind::Bullet,
            "ol" => ListKind::Numbered,
            _ => ListKind::None,
        };
        let alignment = lower
            .split_once("text-align:")
            .and_then(|(_, rest)| rest.trim_start().split(|c: char| c == ';' || c == '"').next())
            .and_then(Alignment::from_css)
            .unwrap_or_default();

        Self {
            text: plain_text(html),
            block: BlockStyle::from_tag(&first_tag).unwrap_or_default(),
            alignment,
            list,
            ..Self::default()
        }
    }

    fn toggle_inline(&mut self, style: InlineStyle) {
        if let Some(pos) = self.inline.iter().position(|s| *s == style) {
            self.inline.remove(pos);
        } else {
            self.inline.push(style);
        }
    }

    fn toggle_list(&mut self, kind: ListKind) {
        self.list = if self.list == kind { ListKind::None } else { kind };
    }

    fn block_tag(&self) -> &'static str {
        match self.block {
            BlockStyle::Generic => "div",
            other => other.format_tag(),
        }
    }

    fn align_css(&self) -> &'static str {
        match self.alignment {
            Alignment::Left => "start",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    fn render(&self) -> String {
        let mut inner = if self.text.is_empty() {
            "<br>".to_string()
        } else {
            self.text.clone()
        };
        for style in &self.inline {
            let tag = inline_tag(*style);
            inner = format!("<{tag}>{inner}</{tag}>");
        }
        if let Some(url) = &self.link {
            inner = format!("<a href=\"{url}\">{inner}</a>");
        }

        let style_attr = if self.alignment == Alignment::Left {
            String::new()
        } else {
            format!(" style=\"text-align: {};\"", self.alignment)
        };

        let mut html = match self.list {
            ListKind::None => {
                let tag = self.block_tag();
                format!("<{tag}{style_attr}>{inner}</{tag}>")
            }
            ListKind::Bullet => format!("<ul><li{style_attr}>{inner}</li></ul>"),
            ListKind::Numbered => format!("<ol><li{style_attr}>{inner}</li></ol>"),
        };
        if self.indent > 0 {
            html = format!("<div style=\"margin-left: {}px;\">{html}</div>", 40 * u32::from(self.indent));
        }
        for _ in 0..self.rules {
            html.push_str("<hr>");
        }
        html
    }

    /// Anchor-to-root element path, innermost first.
    fn ancestors(&self) -> Vec<ElementInfo> {
        let align = self.align_css();
        let mut path = Vec::new();
        if self.link.is_some() {
            path.push(ElementInfo::aligned("a", align));
        }
        for style in self.inline.iter().rev() {
            path.push(ElementInfo::aligned(inline_tag(*style), align));
        }
        match self.list {
            ListKind::None => path.push(ElementInfo::aligned(self.block_tag(), align)),
            ListKind::Bullet => {
                path.push(ElementInfo::aligned("li", align));
                path.push(ElementInfo::aligned("ul", "start"));
            }
            ListKind::Numbered => {
                path.push(ElementInfo::aligned("li", align));
                path.push(ElementInfo::aligned("ol", "start"));
            }
        }
        if self.indent > 0 {
            path.push(ElementInfo::aligned("div", "start"));
        }
        path
    }
}

fn inline_tag(style: InlineStyle) -> &'static str {
    match style {
        InlineStyle::Bold => "b",
        InlineStyle::Italic => "i",
        InlineStyle::Underline => "u",
        InlineStyle::Strikethrough => "strike",
        InlineStyle::Subscript => "sub",
        InlineStyle::Superscript => "sup",
    }
}

/// Region state shared between a [`MemoryHost`] and its inspection handles.
#[derive(Debug, Default)]
struct Region {
    model: Model,
    html: String,
    focused: bool,
    has_selection: bool,
    selection_generation: u64,
    detached: bool,
    rejected: Vec<String>,
    commands: Vec<NativeCommand>,
    restores: usize,
    undo: Vec<Model>,
    redo: Vec<Model>,
}

impl Region {
    fn apply(&mut self, command: &NativeCommand) {
        match command {
            NativeCommand::Undo => {
                if let Some(prev) = self.undo.pop() {
                    self.redo.push(std::mem::replace(&mut self.model, prev));
                }
            }
            NativeCommand::Redo => {
                if let Some(next) = self.redo.pop() {
                    self.undo.push(std::mem::replace(&mut self.model, next));
                }
            }
            other => {
                self.undo.push(self.model.clone());
                self.redo.clear();
                let m = &mut self.model;
                match other {
                    NativeCommand::Bold => m.toggle_inline(InlineStyle::Bold),
                    NativeCommand::Italic => m.toggle_inline(InlineStyle::Italic),
                    NativeCommand::Underline => m.toggle_inline(InlineStyle::Underline),
                    NativeCommand::StrikeThrough => m.toggle_inline(InlineStyle::Strikethrough),
                    NativeCommand::Subscript => m.toggle_inline(InlineStyle::Subscript),
                    NativeCommand::Superscript => m.toggle_inline(InlineStyle::Superscript),
                    NativeCommand::JustifyLeft => m.alignment = Alignment::Left,
                    NativeCommand::JustifyCenter => m.alignment = Alignment::Center,
                    NativeCommand::JustifyRight => m.alignment = Alignment::Right,
                    NativeCommand::JustifyFull => m.alignment = Alignment::Justify,
                    NativeCommand::InsertOrderedList => m.toggle_list(ListKind::Numbered),
                    NativeCommand::InsertUnorderedList => m.toggle_list(ListKind::Bullet),
                    NativeCommand::CreateLink(url) => m.link = Some(url.clone()),
                    NativeCommand::Unlink => m.link = None,
                    NativeCommand::RemoveFormat => m.inline.clear(),
                    NativeCommand::FormatBlock(style) => {
                        m.block = *style;
                        m.list = ListKind::None;
                    }
                    NativeCommand::Indent => m.indent = m.indent.saturating_add(1),
                    NativeCommand::Outdent => m.indent = m.indent.saturating_sub(1),
                    NativeCommand::InsertHorizontalRule => m.rules += 1,
                    NativeCommand::Undo | NativeCommand::Redo => {}
                }
            }
        }
        self.html = self.model.render();
    }
}

/// Saved selection in a [`MemoryHost`]; expires when the region changes underneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemorySelection {
    generation: u64,
}

/// Headless [`RichTextHost`].
///
/// Cloning yields another handle to the same region, so a test can keep one
/// while the surface owns the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    region: Arc<Mutex<Region>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup.
    pub fn html(&self) -> String {
        self.region.lock().html.clone()
    }

    /// Native commands received so far, in order.
    pub fn commands(&self) -> Vec<NativeCommand> {
        self.region.lock().commands.clone()
    }

    /// How many saved selections were restored successfully.
    pub fn restores(&self) -> usize {
        self.region.lock().restores
    }

    /// Simulate the user clicking into the region.
    pub fn click(&self) {
        let mut region = self.region.lock();
        region.focused = true;
        region.has_selection = true;
    }

    /// Simulate focus moving elsewhere (e.g. onto a toolbar button).
    pub fn blur(&self) {
        let mut region = self.region.lock();
        region.focused = false;
        region.has_selection = false;
    }

    /// Simulate typing at the end of the text.
    pub fn type_text(&self, text: &str) {
        let mut region = self.region.lock();
        region.model.text.push_str(text);
        region.html = region.model.render();
    }

    /// Simulate select-all + delete: the region is left with a bare `<br>`.
    pub fn clear(&self) {
        let mut region = self.region.lock();
        region.model = Model::default();
        region.html = "<br>".to_string();
    }

    /// Make every saved selection stale.
    pub fn invalidate_selection(&self) {
        self.region.lock().selection_generation += 1;
    }

    /// Reject the named native command (e.g. `"createLink"`).
    pub fn reject(&self, command: &str) {
        self.region.lock().rejected.push(command.to_string());
    }

    /// Tear the region down; focus and commands fail afterwards.
    pub fn detach(&self) {
        self.region.lock().detached = true;
    }

    /// Simulate the caret moving into an existing link.
    pub fn place_caret_in_link(&self, url: &str) {
        let mut region = self.region.lock();
        region.model.link = Some(url.to_string());
        region.html = region.model.render();
        region.has_selection = true;
    }
}

impl RichTextHost for MemoryHost {
    type Selection = MemorySelection;

    fn exec(&mut self, command: &NativeCommand) -> Result<(), HostError> {
        let mut region = self.region.lock();
        if region.detached {
            return Err(HostError::Detached);
        }
        region.commands.push(command.clone());
        if region.rejected.iter().any(|name| name == command.name()) {
            return Err(HostError::CommandRejected {
                command: command.name().to_string(),
                reason: "rejected by host".to_string(),
            });
        }
        region.apply(command);
        Ok(())
    }

    fn query_state(&self, state: CommandState) -> bool {
        let region = self.region.lock();
        match state {
            CommandState::Inline(style) => region.model.inline.contains(&style),
            CommandState::List(kind) => region.model.list == kind,
        }
    }

    fn capture_selection(&self) -> Option<MemorySelection> {
        let region = self.region.lock();
        region.has_selection.then_some(MemorySelection {
            generation: region.selection_generation,
        })
    }

    fn restore_selection(&mut self, selection: &MemorySelection) -> Result<(), HostError> {
        let mut region = self.region.lock();
        if region.detached {
            return Err(HostError::Detached);
        }
        if selection.generation != region.selection_generation {
            return Err(HostError::SelectionExpired);
        }
        region.has_selection = true;
        region.restores += 1;
        Ok(())
    }

    fn focus(&mut self) -> Result<(), HostError> {
        let mut region = self.region.lock();
        if region.detached {
            return Err(HostError::Detached);
        }
        region.focused = true;
        region.has_selection = true;
        Ok(())
    }

    fn has_focus(&self) -> bool {
        let region = self.region.lock();
        region.focused && !region.detached
    }

    fn inner_html(&self) -> String {
        self.html()
    }

    fn set_inner_html(&mut self, html: &str) {
        let mut region = self.region.lock();
        region.model = Model::from_html(html);
        region.html = html.to_string();
        region.selection_generation += 1;
    }

    fn selection_ancestors(&self) -> Option<Vec<ElementInfo>> {
        let region = self.region.lock();
        region.has_selection.then(|| region.model.ancestors())
    }

    fn selection_in_link(&self) -> bool {
        let region = self.region.lock();
        region.has_selection && region.model.link.is_some()
    }
}

/// Creates a [`MemoryHost`] per block and keeps a handle to each.
#[derive(Clone, Debug, Default)]
pub struct MemoryHostFactory {
    hosts: Arc<Mutex<HashMap<BlockId, MemoryHost>>>,
}

impl MemoryHostFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the host created for a block.
    pub fn host(&self, id: BlockId) -> Option<MemoryHost> {
        self.hosts.lock().get(&id).cloned()
    }
}

impl HostFactory for MemoryHostFactory {
    type Host = MemoryHost;

    fn create(&mut self, id: BlockId) -> MemoryHost {
        let host = MemoryHost::new();
        self.hosts.lock().insert(id, host.clone());
        host
    }
}

/// Answers URL prompts from a queue; cancels once the queue is empty.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<String>>,
    asked: usize,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, url: impl Into<String>) -> Self {
        self.answers.push_back(Some(url.into()));
        self
    }

    pub fn cancel(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    /// How many times the prompt was shown.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl UrlPrompt for ScriptedPrompt {
    fn prompt_url(&mut self) -> Option<String> {
        self.asked += 1;
        self.answers.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reflects_commands() {
        let mut host = MemoryHost::new();
        host.set_inner_html("<p>Hello</p>");
        host.exec(&NativeCommand::Bold).unwrap();
        host.exec(&NativeCommand::JustifyCenter).unwrap();
        host.exec(&NativeCommand::FormatBlock(BlockStyle::Heading2)).unwrap();
        assert_eq!(host.html(), "<h2 style=\"text-align: center;\"><b>Hello</b></h2>");
    }

    #[test]
    fn test_from_html_reads_block_and_alignment() {
        let mut host = MemoryHost::new();
        host.set_inner_html("<h3 style=\"text-align: right;\">T</h3>");
        host.click();
        let path = host.selection_ancestors().unwrap();
        assert_eq!(path[0].tag, "h3");
        assert_eq!(path[0].text_align.as_deref(), Some("right"));
    }

    #[test]
    fn test_undo_redo() {
        let mut host = MemoryHost::new();
        host.set_inner_html("<p>x</p>");
        let before = host.html();
        host.exec(&NativeCommand::Italic).unwrap();
        let after = host.html();
        host.exec(&NativeCommand::Undo).unwrap();
        assert_eq!(host.html(), before);
        host.exec(&NativeCommand::Redo).unwrap();
        assert_eq!(host.html(), after);
    }

    #[test]
    fn test_rejected_and_detached() {
        let mut host = MemoryHost::new();
        host.reject("createLink");
        let err = host.exec(&NativeCommand::CreateLink("u".into())).unwrap_err();
        assert!(matches!(err, HostError::CommandRejected { .. }));

        host.detach();
        assert_eq!(host.focus(), Err(HostError::Detached));
        assert!(!host.has_focus());
    }

    #[test]
    fn test_selection_expires_on_external_write() {
        let mut host = MemoryHost::new();
        host.click();
        let saved = host.capture_selection().unwrap();
        host.set_inner_html("<p>replaced</p>");
        assert_eq!(host.restore_selection(&saved), Err(HostError::SelectionExpired));
    }

    #[test]
    fn test_scripted_prompt() {
        let mut prompt = ScriptedPrompt::new().answer("https://x.example").cancel();
        assert_eq!(prompt.prompt_url().as_deref(), Some("https://x.example"));
        assert_eq!(prompt.prompt_url(), None);
        assert_eq!(prompt.prompt_url(), None);
        assert_eq!(prompt.asked(), 3);
    }
}
