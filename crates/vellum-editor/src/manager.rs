//! Block manager: the ordered block sequence and its sync to the form.
//!
//! The manager expands the form's [`Document`] into blocks once, on
//! construction, and owns the sequence from then on. Every change to the
//! sequence (content edit, add, delete, move) restarts a quiet-period timer;
//! when it fires, the full current sequence is collapsed back into a
//! `Document` and handed to the [`DocumentSink`].
//!
//! ```text
//!  form ──Document──▶ BlockManager::new ──▶ [Block, Block, ...]
//!                                              │  add / delete / move / update
//!                                              ▼
//!  form ◀──Document── sink ◀── sync debounce (quiet period)
//! ```
//!
//! The sink never sees the initial state, only sequences produced by edits.
//! The manager knows nothing about formatting; surfaces reach it only through
//! a [`BlockBinding`] scoped to their own block.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use vellum_types::{Block, BlockId, ContentRecord, Document, EditorId};

use crate::config::EditorConfig;
use crate::debounce::Debouncer;
use crate::id_gen::{IdGenerator, UuidIds};

/// Receives the serialized document after each quiet period.
pub trait DocumentSink: Send + Sync + 'static {
    fn document_changed(&self, document: Document);
}

impl<F> DocumentSink for F
where
    F: Fn(Document) + Send + Sync + 'static,
{
    fn document_changed(&self, document: Document) {
        self(document)
    }
}

struct ManagerState {
    blocks: Vec<Block>,
    /// The single block whose toolbar is showing.
    active: Option<BlockId>,
    ids: Box<dyn IdGenerator>,
}

impl ManagerState {
    fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    fn document(&self) -> Document {
        Document(
            self.blocks
                .iter()
                .map(|b| ContentRecord::new(b.content.clone()))
                .collect(),
        )
    }

    fn fresh_block(&mut self) -> Block {
        Block::placeholder(self.ids.next_id())
    }
}

struct ManagerInner {
    editor_id: EditorId,
    state: Mutex<ManagerState>,
    sink: Arc<dyn DocumentSink>,
    sync: Debouncer,
}

impl ManagerInner {
    fn emit(&self) {
        // Snapshot under the lock, call out without it
        let document = self.state.lock().document();
        tracing::debug!(
            editor = %self.editor_id.short(),
            blocks = document.len(),
            "emitting document"
        );
        self.sink.document_changed(document);
    }
}

/// Owner of the ordered block sequence. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct BlockManager {
    inner: Arc<ManagerInner>,
}

impl BlockManager {
    /// Expand a document into blocks with UUIDv7 IDs.
    pub fn new(document: Document, sink: impl DocumentSink, config: &EditorConfig) -> Self {
        Self::with_id_generator(document, sink, config, Box::new(UuidIds))
    }

    /// Expand a document into blocks, drawing IDs from `ids`.
    ///
    /// One block per fragment, in order; an empty document yields a single
    /// placeholder block. This is the only time the document is read.
    pub fn with_id_generator(
        document: Document,
        sink: impl DocumentSink,
        config: &EditorConfig,
        mut ids: Box<dyn IdGenerator>,
    ) -> Self {
        let mut blocks: Vec<Block> = document
            .into_iter()
            .map(|record| Block::new(ids.next_id(), record.content))
            .collect();
        if blocks.is_empty() {
            blocks.push(Block::placeholder(ids.next_id()));
        }

        let editor_id = EditorId::new();
        tracing::debug!(editor = %editor_id.short(), blocks = blocks.len(), "block manager initialized");

        Self {
            inner: Arc::new(ManagerInner {
                editor_id,
                state: Mutex::new(ManagerState {
                    blocks,
                    active: None,
                    ids,
                }),
                sink: Arc::new(sink),
                sync: Debouncer::new("document-sync", config.sync_debounce()),
            }),
        }
    }

    pub fn editor_id(&self) -> EditorId {
        self.inner.editor_id
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.inner.state.lock().blocks.len()
    }

    /// Always false: a document keeps at least one block.
    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().blocks.is_empty()
    }

    /// Blocks in document order.
    pub fn blocks(&self) -> Vec<Block> {
        self.inner.state.lock().blocks.clone()
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.inner.state.lock().blocks.iter().map(|b| b.id).collect()
    }

    pub fn block(&self, id: BlockId) -> Option<Block> {
        let state = self.inner.state.lock();
        state.position(id).map(|i| state.blocks[i].clone())
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.inner.state.lock().position(id)
    }

    /// The current sequence as the form would receive it.
    pub fn document(&self) -> Document {
        self.inner.state.lock().document()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append an empty-paragraph block. Returns its ID.
    pub fn add_block(&self) -> BlockId {
        let id = {
            let mut state = self.inner.state.lock();
            let block = state.fresh_block();
            let id = block.id;
            state.blocks.push(block);
            id
        };
        tracing::debug!(editor = %self.inner.editor_id.short(), block = %id.short(), "block added");
        self.schedule_sync();
        id
    }

    /// Remove a block, keeping the others in order.
    ///
    /// Deleting the last remaining block swaps in a fresh placeholder block
    /// instead. Clears the active pointer. Unknown IDs are a no-op; returns
    /// whether anything was removed.
    pub fn delete_block(&self, id: BlockId) -> bool {
        let replacement = {
            let mut state = self.inner.state.lock();
            let Some(index) = state.position(id) else {
                tracing::debug!(block = %id.short(), "delete of unknown block ignored");
                return false;
            };
            state.active = None;
            if state.blocks.len() == 1 {
                let fresh = state.fresh_block();
                let fresh_id = fresh.id;
                state.blocks = vec![fresh];
                Some(fresh_id)
            } else {
                state.blocks.remove(index);
                None
            }
        };
        tracing::debug!(
            editor = %self.inner.editor_id.short(),
            block = %id.short(),
            replacement = ?replacement,
            "block deleted"
        );
        self.schedule_sync();
        true
    }

    /// Replace one block's content. Order and other blocks are untouched.
    ///
    /// Returns false for unknown IDs or when the content is unchanged.
    pub fn update_block(&self, id: BlockId, content: &str) -> bool {
        {
            let mut state = self.inner.state.lock();
            let Some(index) = state.position(id) else {
                tracing::debug!(block = %id.short(), "update of unknown block ignored");
                return false;
            };
            let block = &mut state.blocks[index];
            let before = std::mem::take(&mut block.content);
            block.set_content(content);
            if block.content == before {
                return false;
            }
        }
        tracing::trace!(block = %id.short(), "block content updated");
        self.schedule_sync();
        true
    }

    /// Swap the block at `index` with the one above it. No-op at the top.
    pub fn move_up(&self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        self.swap(index - 1, index)
    }

    /// Swap the block at `index` with the one below it. No-op at the bottom.
    pub fn move_down(&self, index: usize) -> bool {
        let Some(below) = index.checked_add(1) else {
            return false;
        };
        self.swap(index, below)
    }

    fn swap(&self, a: usize, b: usize) -> bool {
        {
            let mut state = self.inner.state.lock();
            if b >= state.blocks.len() {
                return false;
            }
            state.blocks.swap(a, b);
        }
        tracing::debug!(editor = %self.inner.editor_id.short(), from = a, to = b, "blocks swapped");
        self.schedule_sync();
        true
    }

    // =========================================================================
    // Active block
    // =========================================================================

    pub fn active(&self) -> Option<BlockId> {
        self.inner.state.lock().active
    }

    pub fn is_active(&self, id: BlockId) -> bool {
        self.active() == Some(id)
    }

    /// Make `id` the single active block. Unknown IDs are ignored.
    pub fn set_active(&self, id: BlockId) {
        let mut state = self.inner.state.lock();
        if state.position(id).is_none() || state.active == Some(id) {
            return;
        }
        let previous = state.active.replace(id);
        tracing::debug!(block = %id.short(), previous = ?previous, "block activated");
    }

    pub fn clear_active(&self) {
        if let Some(previous) = self.inner.state.lock().active.take() {
            tracing::debug!(block = %previous.short(), "block deactivated");
        }
    }

    /// Clear the active pointer only if `id` holds it.
    pub fn deactivate(&self, id: BlockId) -> bool {
        let mut state = self.inner.state.lock();
        if state.active == Some(id) {
            state.active = None;
            tracing::debug!(block = %id.short(), "block deactivated");
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Sync
    // =========================================================================

    fn schedule_sync(&self) {
        let weak: Weak<ManagerInner> = Arc::downgrade(&self.inner);
        self.inner.sync.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.emit();
            }
        });
    }

    /// Whether an emission is waiting out its quiet period.
    pub fn sync_pending(&self) -> bool {
        self.inner.sync.is_pending()
    }

    /// Emit now if an emission is pending (e.g. the form is submitting).
    pub fn flush(&self) -> bool {
        if self.inner.sync.cancel() {
            self.inner.emit();
            true
        } else {
            false
        }
    }

    /// Binding for the surface that edits `id`.
    pub fn bind(&self, id: BlockId) -> BlockBinding {
        BlockBinding {
            id,
            manager: self.clone(),
        }
    }
}

impl std::fmt::Debug for BlockManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("BlockManager")
            .field("editor_id", &self.inner.editor_id)
            .field("blocks", &state.blocks)
            .field("active", &state.active)
            .finish()
    }
}

/// A surface's view of the manager: its own block only.
#[derive(Clone, Debug)]
pub struct BlockBinding {
    id: BlockId,
    manager: BlockManager,
}

impl BlockBinding {
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Report new content for this block.
    pub fn update(&self, content: &str) -> bool {
        self.manager.update_block(self.id, content)
    }

    pub fn activate(&self) {
        self.manager.set_active(self.id);
    }

    pub fn deactivate(&self) -> bool {
        self.manager.deactivate(self.id)
    }

    pub fn is_active(&self) -> bool {
        self.manager.is_active(self.id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vellum_types::EMPTY_PARAGRAPH;

    use super::*;
    use crate::id_gen::SequentialIds;

    type Emitted = Arc<Mutex<Vec<Document>>>;

    fn manager(contents: Vec<&str>) -> (BlockManager, Emitted) {
        let emitted: Emitted = Arc::new(Mutex::new(Vec::new()));
        let sink = emitted.clone();
        let manager = BlockManager::with_id_generator(
            Document::from(contents),
            move |doc| sink.lock().push(doc),
            &EditorConfig::default(),
            Box::new(SequentialIds::new()),
        );
        (manager, emitted)
    }

    async fn quiet() {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    #[test]
    fn test_initialize_one_block_per_fragment() {
        let (m, _) = manager(vec!["<p>A</p>", "<p>B</p>", "<p>C</p>"]);
        let blocks = m.blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks.iter().map(|b| b.content.as_str()).collect::<Vec<_>>(),
            vec!["<p>A</p>", "<p>B</p>", "<p>C</p>"]
        );
        let mut ids = m.block_ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_initialize_empty_document_yields_placeholder() {
        let (m, _) = manager(vec![]);
        let blocks = m.blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, EMPTY_PARAGRAPH);
    }

    #[test]
    fn test_initialize_normalizes_empty_fragments() {
        let (m, _) = manager(vec!["", "<p>B</p>"]);
        assert_eq!(m.blocks()[0].content, EMPTY_PARAGRAPH);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_is_not_emitted() {
        let (_m, emitted) = manager(vec!["<p>A</p>"]);
        quiet().await;
        assert!(emitted.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_block_appends_placeholder() {
        let (m, _) = manager(vec!["<p>A</p>"]);
        let first = m.block_ids()[0];
        let id = m.add_block();
        assert_eq!(m.block_ids(), vec![first, id]);
        assert!(m.block(id).unwrap().is_placeholder());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_preserves_order() {
        let (m, _) = manager(vec!["<p>A</p>", "<p>B</p>", "<p>C</p>"]);
        let ids = m.block_ids();
        assert!(m.delete_block(ids[1]));
        assert_eq!(m.block_ids(), vec![ids[0], ids[2]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_last_block_replaces_with_fresh_placeholder() {
        let (m, emitted) = manager(vec!["<p>Only</p>"]);
        let only = m.block_ids()[0];
        assert!(m.delete_block(only));

        let blocks = m.blocks();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_placeholder());
        assert_ne!(blocks[0].id, only);

        quiet().await;
        assert_eq!(emitted.lock().as_slice(), &[Document::from(vec![EMPTY_PARAGRAPH])]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_clears_active_and_ignores_unknown() {
        let (m, _) = manager(vec!["<p>A</p>", "<p>B</p>"]);
        let ids = m.block_ids();
        m.set_active(ids[0]);
        assert!(!m.delete_block(BlockId::from_seq(999)));
        assert_eq!(m.active(), Some(ids[0]));

        m.delete_block(ids[1]);
        assert_eq!(m.active(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_boundaries_are_noops() {
        let (m, emitted) = manager(vec!["<p>A</p>", "<p>B</p>"]);
        let ids = m.block_ids();
        assert!(!m.move_up(0));
        assert!(!m.move_down(1));
        assert!(!m.move_down(7));
        assert!(!m.move_down(usize::MAX));
        assert!(!m.move_up(usize::MAX));
        assert_eq!(m.block_ids(), ids);

        quiet().await;
        assert!(emitted.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_swap_keeps_ids_with_content() {
        let (m, _) = manager(vec!["<p>A</p>", "<p>B</p>"]);
        let before = m.blocks();
        assert!(m.move_down(0));
        let after = m.blocks();
        assert_eq!(after[0], before[1]);
        assert_eq!(after[1], before[0]);

        assert!(m.move_up(1));
        assert_eq!(m.blocks(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_touches_only_target() {
        let (m, _) = manager(vec!["<p>A</p>", "<p>B</p>"]);
        let ids = m.block_ids();
        assert!(m.update_block(ids[1], "<p>B2</p>"));
        assert_eq!(m.document(), Document::from(vec!["<p>A</p>", "<p>B2</p>"]));
        assert!(!m.update_block(ids[1], "<p>B2</p>"));
        assert!(!m.update_block(BlockId::from_seq(42), "<p>x</p>"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_updates_emit_once_with_last_value() {
        let (m, emitted) = manager(vec!["<p>A</p>"]);
        let id = m.block_ids()[0];
        for n in 0..10 {
            m.update_block(id, &format!("<p>A{n}</p>"));
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(emitted.lock().is_empty());

        quiet().await;
        assert_eq!(emitted.lock().as_slice(), &[Document::from(vec!["<p>A9</p>"])]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_emission_reflects_state_at_fire_time() {
        let (m, emitted) = manager(vec!["<p>A</p>"]);
        m.add_block();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = m.block_ids()[1];
        m.update_block(second, "<p>B</p>");
        m.move_up(1);

        quiet().await;
        quiet().await;
        assert_eq!(
            emitted.lock().as_slice(),
            &[Document::from(vec!["<p>B</p>", "<p>A</p>"])]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_emits_immediately() {
        let (m, emitted) = manager(vec!["<p>A</p>"]);
        assert!(!m.flush());
        m.add_block();
        assert!(m.sync_pending());
        assert!(m.flush());
        assert_eq!(emitted.lock().len(), 1);

        quiet().await;
        assert_eq!(emitted.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_emission_after_manager_dropped() {
        let (m, emitted) = manager(vec!["<p>A</p>"]);
        m.add_block();
        drop(m);
        quiet().await;
        assert!(emitted.lock().is_empty());
    }

    #[test]
    fn test_single_active_block() {
        let (m, _) = manager(vec!["<p>A</p>", "<p>B</p>"]);
        let ids = m.block_ids();
        let a = m.bind(ids[0]);
        let b = m.bind(ids[1]);

        a.activate();
        assert!(a.is_active());
        b.activate();
        assert!(!a.is_active());
        assert!(b.is_active());

        assert!(!a.deactivate());
        assert!(b.deactivate());
        assert_eq!(m.active(), None);
    }
}
