//! Block surface: one block's editable region and its toolbar state.
//!
//! A surface is **Inactive** until its region is focused or clicked, then
//! **Active** while it holds the manager's single active-block pointer. It
//! keeps the content it last reported (`last_content`) loosely in sync with
//! the region:
//!
//! - typed input settles for `input_debounce` before being reported
//! - formatting commands settle for `command_settle` before the markup is
//!   read back, since the native command mutates the region on its own time
//! - external resets overwrite the region only when no typed input is pending
//!
//! Every host failure (stale selection, rejected command, detached region) is
//! logged and ignored; no surface operation returns an error.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use vellum_types::{Alignment, BlockId, BlockStyle, FormatState, InlineStyle, ListKind, normalize_content};

use crate::command::{CommandPlan, FormatCommand, KeyChord, plan, shortcut};
use crate::config::EditorConfig;
use crate::debounce::Debouncer;
use crate::host::{CommandState, NativeCommand, RichTextHost, UrlPrompt};
use crate::layout::Layout;
use crate::manager::BlockBinding;

struct SurfaceState<H: RichTextHost> {
    host: H,
    /// Content most recently reported to (or received from) the manager.
    last_content: String,
    format: FormatState,
    /// Bumped each time `format` is replaced.
    format_revision: u64,
    /// Where the last command should apply; released on unmount.
    selection: Option<H::Selection>,
    mounted: bool,
    layout: Layout,
    mobile_toolbar: bool,
}

impl<H: RichTextHost> SurfaceState<H> {
    fn save_selection(&mut self) {
        if let Some(selection) = self.host.capture_selection() {
            self.selection = Some(selection);
        }
    }

    /// Put the caret back where the user left it and focus the region.
    fn prepare(&mut self, block: BlockId) {
        if let Some(selection) = &self.selection
            && let Err(e) = self.host.restore_selection(selection)
        {
            tracing::warn!(block = %block.short(), error = %e, "failed to restore selection");
        }
        if let Err(e) = self.host.focus() {
            tracing::warn!(block = %block.short(), error = %e, "failed to focus region");
        }
    }

    fn exec(&mut self, block: BlockId, command: &NativeCommand) {
        match self.host.exec(command) {
            Ok(()) => tracing::trace!(block = %block.short(), command = command.name(), "executed"),
            Err(e) => tracing::warn!(
                block = %block.short(),
                command = command.name(),
                error = %e,
                "native command failed"
            ),
        }
    }

    /// Markup currently in the region, normalized.
    fn read_content(&self) -> String {
        normalize_content(&self.host.inner_html())
    }

    /// Re-derive the formatting snapshot from the selection. Replaces the
    /// stored snapshot only when a field differs.
    fn recompute(&mut self) -> bool {
        let Some(ancestors) = self.host.selection_ancestors() else {
            return false;
        };

        let block_at = ancestors
            .iter()
            .position(|el| BlockStyle::from_tag(&el.tag).is_some());
        let block = block_at
            .and_then(|i| BlockStyle::from_tag(&ancestors[i].tag))
            .unwrap_or_default();
        let alignment = ancestors
            .iter()
            .skip(block_at.unwrap_or(0))
            .find_map(|el| el.text_align.as_deref().and_then(Alignment::from_css))
            .unwrap_or_default();

        let mut next = FormatState {
            block,
            alignment,
            in_link: self.host.selection_in_link(),
            ..FormatState::default()
        };
        for style in InlineStyle::ALL {
            next.set_inline(style, self.host.query_state(CommandState::Inline(style)));
        }
        next.list = if self.host.query_state(CommandState::List(ListKind::Bullet)) {
            ListKind::Bullet
        } else if self.host.query_state(CommandState::List(ListKind::Numbered)) {
            ListKind::Numbered
        } else {
            ListKind::None
        };

        if next == self.format {
            return false;
        }
        self.format = next;
        self.format_revision += 1;
        tracing::trace!(revision = self.format_revision, format = ?self.format, "format state changed");
        true
    }
}

struct SurfaceInner<H: RichTextHost> {
    binding: BlockBinding,
    state: Mutex<SurfaceState<H>>,
    input_settle: Debouncer,
    command_settle: Debouncer,
    breakpoint_px: u32,
}

impl<H: RichTextHost> SurfaceInner<H> {
    fn id(&self) -> BlockId {
        self.binding.id()
    }

    /// Report the region's markup if it moved away from `last_content`,
    /// then refresh the selection and snapshot.
    fn commit(&self) {
        let changed = {
            let mut state = self.state.lock();
            if !state.mounted {
                return;
            }
            let content = state.read_content();
            let changed = (content != state.last_content).then(|| {
                state.last_content = content.clone();
                content
            });
            state.save_selection();
            state.recompute();
            changed
        };
        if let Some(content) = changed {
            tracing::debug!(block = %self.id().short(), "reporting block content");
            self.binding.update(&content);
        }
    }
}

/// One mounted block. Cheap to clone; clones share the same region.
pub struct BlockSurface<H: RichTextHost> {
    inner: Arc<SurfaceInner<H>>,
}

impl<H: RichTextHost> Clone for BlockSurface<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: RichTextHost> BlockSurface<H> {
    /// Attach a surface to `host`, seeding the region with `content` when it
    /// is blank.
    pub fn mount(mut host: H, binding: BlockBinding, content: &str, config: &EditorConfig) -> Self {
        let content = normalize_content(content);
        if host.inner_html().trim().is_empty() {
            host.set_inner_html(&content);
        }
        tracing::debug!(block = %binding.id().short(), "surface mounted");

        Self {
            inner: Arc::new(SurfaceInner {
                binding,
                state: Mutex::new(SurfaceState {
                    host,
                    last_content: content,
                    format: FormatState::default(),
                    format_revision: 0,
                    selection: None,
                    mounted: true,
                    layout: Layout::default(),
                    mobile_toolbar: false,
                }),
                input_settle: Debouncer::new("input-settle", config.input_debounce()),
                command_settle: Debouncer::new("command-settle", config.command_settle()),
                breakpoint_px: config.mobile_breakpoint_px,
            }),
        }
    }

    /// Cancel timers and release the saved selection. Nothing fires after this.
    pub fn unmount(&self) {
        self.inner.input_settle.cancel();
        self.inner.command_settle.cancel();
        let mut state = self.inner.state.lock();
        if !state.mounted {
            return;
        }
        state.mounted = false;
        state.selection = None;
        state.mobile_toolbar = false;
        drop(state);
        self.inner.binding.deactivate();
        tracing::debug!(block = %self.id().short(), "surface unmounted");
    }

    pub fn id(&self) -> BlockId {
        self.inner.id()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.state.lock().mounted
    }

    /// Active = holds the manager's active-block pointer; the toolbar shows.
    pub fn is_active(&self) -> bool {
        self.is_mounted() && self.inner.binding.is_active()
    }

    pub fn content(&self) -> String {
        self.inner.state.lock().last_content.clone()
    }

    /// Current markup in the region, including uncommitted typing.
    pub fn region_html(&self) -> String {
        self.inner.state.lock().host.inner_html()
    }

    pub fn format_state(&self) -> FormatState {
        self.inner.state.lock().format
    }

    pub fn format_revision(&self) -> u64 {
        self.inner.state.lock().format_revision
    }

    pub fn input_pending(&self) -> bool {
        self.inner.input_settle.is_pending()
    }

    // =========================================================================
    // Activation
    // =========================================================================

    pub fn on_focus(&self) {
        self.activate();
    }

    /// Move focus into the region programmatically.
    pub fn focus(&self) {
        {
            let mut state = self.inner.state.lock();
            if !state.mounted {
                return;
            }
            if let Err(e) = state.host.focus() {
                tracing::warn!(block = %self.id().short(), error = %e, "failed to focus region");
            }
        }
        self.activate();
    }

    pub fn on_click(&self) {
        self.activate();
    }

    fn activate(&self) {
        let mut state = self.inner.state.lock();
        if !state.mounted {
            return;
        }
        self.inner.binding.activate();
        state.save_selection();
        state.recompute();
    }

    /// A pointer-down landed outside this block's container.
    pub fn on_outside_pointer_down(&self) {
        self.deactivate();
        self.hide_mobile_toolbar();
    }

    /// Give up the active pointer if this block holds it.
    pub fn deactivate(&self) {
        self.inner.binding.deactivate();
    }

    /// Native selection moved. Only tracked while the region has focus.
    pub fn on_selection_change(&self) {
        let mut state = self.inner.state.lock();
        if !state.mounted || !state.host.has_focus() {
            return;
        }
        state.save_selection();
        state.recompute();
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Raw input event: schedule a report once typing pauses.
    pub fn on_input(&self) {
        let dirty = {
            let mut state = self.inner.state.lock();
            if !state.mounted {
                return;
            }
            state.save_selection();
            state.read_content() != state.last_content
        };

        if !dirty {
            // Typed back to what was last reported
            self.inner.input_settle.cancel();
            return;
        }

        let weak: Weak<SurfaceInner<H>> = Arc::downgrade(&self.inner);
        self.inner.input_settle.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.commit();
            }
        });
    }

    /// Content was reset from outside. Overwrites the region unless typed
    /// input or a command read-back is still pending; returns false when
    /// skipped for that reason.
    pub fn external_update(&self, value: &str) -> bool {
        let value = normalize_content(value);
        let mut state = self.inner.state.lock();
        if !state.mounted {
            return false;
        }
        if self.inner.input_settle.is_pending() || self.inner.command_settle.is_pending() {
            tracing::debug!(block = %self.id().short(), "external update skipped; local edits pending");
            return false;
        }
        if state.read_content() == value {
            state.last_content = value;
            return true;
        }
        state.host.set_inner_html(&value);
        state.last_content = value;
        state.selection = None;
        state.recompute();
        tracing::debug!(block = %self.id().short(), "region overwritten by external update");
        true
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Apply a formatting command at the saved selection.
    ///
    /// The link command may block on `prompt`; the surface lock is not held
    /// while it does.
    pub fn apply(&self, command: FormatCommand, prompt: &mut dyn UrlPrompt) {
        let id = self.id();
        let resolved = {
            let mut state = self.inner.state.lock();
            if !state.mounted {
                tracing::debug!(block = %id.short(), ?command, "command on unmounted surface ignored");
                return;
            }
            state.prepare(id);
            state.recompute();
            plan(command, &state.format)
        };
        tracing::debug!(block = %id.short(), ?command, plan = ?resolved, "applying command");

        match resolved {
            CommandPlan::Execute(natives) => {
                let mut state = self.inner.state.lock();
                for native in &natives {
                    state.exec(id, native);
                }
            }
            CommandPlan::Unlink => {
                self.inner.state.lock().exec(id, &NativeCommand::Unlink);
            }
            CommandPlan::PromptForLink => {
                let url = prompt
                    .prompt_url()
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty());
                let Some(url) = url else {
                    tracing::debug!(block = %id.short(), "link prompt cancelled");
                    return;
                };
                let mut state = self.inner.state.lock();
                if !state.mounted {
                    return;
                }
                state.prepare(id);
                state.exec(id, &NativeCommand::CreateLink(url));
            }
        }

        let weak: Weak<SurfaceInner<H>> = Arc::downgrade(&self.inner);
        self.inner.command_settle.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.commit();
            }
        });
    }

    /// Keyboard shortcut while the region has focus. Returns true when the
    /// chord was handled and the default action should be suppressed.
    pub fn handle_key(&self, chord: &KeyChord, prompt: &mut dyn UrlPrompt) -> bool {
        {
            let state = self.inner.state.lock();
            if !state.mounted || !state.host.has_focus() {
                return false;
            }
        }
        match shortcut(chord) {
            Some(command) => {
                self.apply(command, prompt);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn set_viewport_width(&self, width_px: u32) {
        let layout = Layout::from_width(width_px, self.inner.breakpoint_px);
        let mut state = self.inner.state.lock();
        if state.layout != layout {
            state.layout = layout;
            if !layout.is_mobile() {
                state.mobile_toolbar = false;
            }
        }
    }

    pub fn layout(&self) -> Layout {
        self.inner.state.lock().layout
    }

    /// Floating toolbar shows: desktop layout and active.
    pub fn toolbar_visible(&self) -> bool {
        !self.layout().is_mobile() && self.is_active()
    }

    /// Open or close the mobile overlay. Only meaningful while active on mobile.
    pub fn toggle_mobile_toolbar(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        let mut state = self.inner.state.lock();
        if !state.layout.is_mobile() {
            return false;
        }
        state.mobile_toolbar = !state.mobile_toolbar;
        state.mobile_toolbar
    }

    pub fn hide_mobile_toolbar(&self) {
        self.inner.state.lock().mobile_toolbar = false;
    }

    /// Whether the mobile toggle button shows.
    pub fn mobile_toggle_visible(&self) -> bool {
        self.layout().is_mobile() && self.is_active()
    }

    pub fn mobile_toolbar_visible(&self) -> bool {
        let shown = {
            let state = self.inner.state.lock();
            state.layout.is_mobile() && state.mobile_toolbar
        };
        shown && self.is_active()
    }
}

impl<H: RichTextHost> std::fmt::Debug for BlockSurface<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("BlockSurface")
            .field("id", &self.inner.id())
            .field("mounted", &state.mounted)
            .field("last_content", &state.last_content)
            .field("format", &state.format)
            .field("layout", &state.layout)
            .finish()
    }
}
