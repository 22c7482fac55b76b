//! Editor: a block manager plus one mounted surface per block.
//!
//! The editor keeps the set of mounted surfaces equal to the manager's block
//! sequence: after every structural operation it mounts a surface for each new
//! block (through the [`HostFactory`]) and unmounts the surface of each block
//! that is gone, which cancels that surface's timers and releases its saved
//! selection.
//!
//! Outside-click detection is global: [`Editor::pointer_down`] receives the
//! block the pointer landed in, if any, and every *other* block treats it as
//! an outside interaction.

use std::collections::HashMap;

use vellum_types::{Block, BlockId, Document};

use crate::command::{FormatCommand, KeyChord};
use crate::config::EditorConfig;
use crate::host::{HostFactory, UrlPrompt};
use crate::id_gen::{IdGenerator, UuidIds};
use crate::manager::{BlockManager, DocumentSink};
use crate::surface::BlockSurface;

pub struct Editor<F: HostFactory> {
    manager: BlockManager,
    factory: F,
    surfaces: HashMap<BlockId, BlockSurface<F::Host>>,
    config: EditorConfig,
    viewport_px: Option<u32>,
}

impl<F: HostFactory> Editor<F> {
    pub fn new(document: Document, sink: impl DocumentSink, factory: F, config: EditorConfig) -> Self {
        Self::with_id_generator(document, sink, factory, config, Box::new(UuidIds))
    }

    pub fn with_id_generator(
        document: Document,
        sink: impl DocumentSink,
        factory: F,
        config: EditorConfig,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let manager = BlockManager::with_id_generator(document, sink, &config, ids);
        let mut editor = Self {
            manager,
            factory,
            surfaces: HashMap::new(),
            config,
            viewport_px: None,
        };
        editor.reconcile();
        editor
    }

    /// Mount surfaces for new blocks, unmount surfaces for removed ones.
    fn reconcile(&mut self) {
        let blocks = self.manager.blocks();

        self.surfaces.retain(|id, surface| {
            let keep = blocks.iter().any(|b| b.id == *id);
            if !keep {
                surface.unmount();
            }
            keep
        });

        for block in &blocks {
            if self.surfaces.contains_key(&block.id) {
                continue;
            }
            let host = self.factory.create(block.id);
            let surface = BlockSurface::mount(host, self.manager.bind(block.id), &block.content, &self.config);
            if let Some(width) = self.viewport_px {
                surface.set_viewport_width(width);
            }
            self.surfaces.insert(block.id, surface);
        }
    }

    pub fn manager(&self) -> &BlockManager {
        &self.manager
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn blocks(&self) -> Vec<Block> {
        self.manager.blocks()
    }

    pub fn document(&self) -> Document {
        self.manager.document()
    }

    pub fn len(&self) -> usize {
        self.manager.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manager.is_empty()
    }

    pub fn active(&self) -> Option<BlockId> {
        self.manager.active()
    }

    pub fn surface(&self, id: BlockId) -> Option<&BlockSurface<F::Host>> {
        self.surfaces.get(&id)
    }

    pub fn surface_at(&self, index: usize) -> Option<&BlockSurface<F::Host>> {
        let id = *self.manager.block_ids().get(index)?;
        self.surfaces.get(&id)
    }

    /// Surfaces in document order.
    pub fn surfaces(&self) -> Vec<&BlockSurface<F::Host>> {
        self.manager
            .block_ids()
            .iter()
            .filter_map(|id| self.surfaces.get(id))
            .collect()
    }

    // =========================================================================
    // Block operations
    // =========================================================================

    /// Append an empty block and focus it.
    pub fn add_block(&mut self) -> BlockId {
        let id = self.manager.add_block();
        self.reconcile();
        if let Some(surface) = self.surfaces.get(&id) {
            surface.focus();
        }
        id
    }

    pub fn delete_block(&mut self, id: BlockId) -> bool {
        let deleted = self.manager.delete_block(id);
        if deleted {
            self.reconcile();
        }
        deleted
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        self.manager.move_up(index)
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        self.manager.move_down(index)
    }

    /// Programmatically replace a block's content.
    ///
    /// Skipped (returns false) while the block has typed input pending.
    pub fn reset_block(&mut self, id: BlockId, content: &str) -> bool {
        match self.surfaces.get(&id) {
            Some(surface) => {
                if !surface.external_update(content) {
                    return false;
                }
                self.manager.update_block(id, content);
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// A pointer went down, inside `target`'s container or outside every block.
    pub fn pointer_down(&self, target: Option<BlockId>) {
        for (id, surface) in &self.surfaces {
            if Some(*id) != target {
                surface.on_outside_pointer_down();
            }
        }
    }

    /// Pointer-down plus click inside a block.
    pub fn click(&self, id: BlockId) {
        self.pointer_down(Some(id));
        if let Some(surface) = self.surfaces.get(&id) {
            surface.on_click();
        }
    }

    /// Apply a formatting command to one block.
    pub fn apply(&self, id: BlockId, command: FormatCommand, prompt: &mut dyn UrlPrompt) -> bool {
        match self.surfaces.get(&id) {
            Some(surface) => {
                surface.apply(command, prompt);
                true
            }
            None => {
                tracing::debug!(block = %id.short(), ?command, "command for unknown block ignored");
                false
            }
        }
    }

    /// Route a key press to the active block.
    pub fn handle_key(&self, chord: &KeyChord, prompt: &mut dyn UrlPrompt) -> bool {
        self.active()
            .and_then(|id| self.surfaces.get(&id))
            .is_some_and(|surface| surface.handle_key(chord, prompt))
    }

    pub fn set_viewport_width(&mut self, width_px: u32) {
        self.viewport_px = Some(width_px);
        for surface in self.surfaces.values() {
            surface.set_viewport_width(width_px);
        }
    }

    /// Deliver any pending document emission now.
    pub fn flush(&self) -> bool {
        self.manager.flush()
    }
}

impl<F: HostFactory> Drop for Editor<F> {
    fn drop(&mut self) {
        for surface in self.surfaces.values() {
            surface.unmount();
        }
    }
}

impl<F: HostFactory> std::fmt::Debug for Editor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("manager", &self.manager)
            .field("mounted", &self.surfaces.len())
            .field("viewport_px", &self.viewport_px)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id_gen::SequentialIds;
    use crate::memory::MemoryHostFactory;

    fn editor(contents: Vec<&str>) -> (Editor<MemoryHostFactory>, MemoryHostFactory) {
        let factory = MemoryHostFactory::new();
        let editor = Editor::with_id_generator(
            Document::from(contents),
            |_doc: Document| {},
            factory.clone(),
            EditorConfig::default(),
            Box::new(SequentialIds::new()),
        );
        (editor, factory)
    }

    #[test]
    fn test_one_surface_per_block() {
        let (e, factory) = editor(vec!["<p>A</p>", "<p>B</p>"]);
        assert_eq!(e.surfaces().len(), 2);
        for block in e.blocks() {
            let host = factory.host(block.id).unwrap();
            assert_eq!(host.html(), block.content);
        }
    }

    #[test]
    fn test_delete_unmounts_surface() {
        let (mut e, _) = editor(vec!["<p>A</p>", "<p>B</p>"]);
        let ids = e.manager().block_ids();
        let removed = e.surface(ids[0]).unwrap().clone();

        assert!(e.delete_block(ids[0]));
        assert!(e.surface(ids[0]).is_none());
        assert!(!removed.is_mounted());
        assert_eq!(e.surfaces().len(), 1);
    }

    #[test]
    fn test_pointer_down_elsewhere_moves_active_block() {
        let (e, factory) = editor(vec!["<p>A</p>", "<p>B</p>"]);
        let ids = e.manager().block_ids();

        factory.host(ids[0]).unwrap().click();
        e.click(ids[0]);
        assert_eq!(e.active(), Some(ids[0]));

        factory.host(ids[1]).unwrap().click();
        e.click(ids[1]);
        assert_eq!(e.active(), Some(ids[1]));
        assert!(!e.surface(ids[0]).unwrap().is_active());

        e.pointer_down(None);
        assert_eq!(e.active(), None);
    }

    #[test]
    fn test_surface_at_follows_order() {
        let (mut e, _) = editor(vec!["<p>A</p>", "<p>B</p>"]);
        let ids = e.manager().block_ids();
        e.move_down(0);
        assert_eq!(e.surface_at(0).unwrap().id(), ids[1]);
        assert_eq!(e.surface_at(1).unwrap().id(), ids[0]);
        assert!(e.surface_at(2).is_none());
    }
}
