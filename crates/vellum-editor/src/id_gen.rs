//! Block ID generation, owned per manager instance.

use vellum_types::BlockId;

/// Source of fresh block IDs.
///
/// Implementations must never hand out the same ID twice for one manager.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> BlockId;
}

/// Time-ordered UUIDv7 IDs. The default.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> BlockId {
        BlockId::new()
    }
}

/// Deterministic IDs `1, 2, 3, ...` for replay and tests.
#[derive(Debug)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId::from_seq(self.next);
        self.next += 1;
        id
    }
}
