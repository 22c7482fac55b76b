//! Typed identifiers for blocks and editor instances.
//!
//! Both ID types wrap UUIDv7 (time-ordered, globally unique). They are
//! internal to a mounted editor and never written into the persisted
//! document. They display as standard UUID text for logging; the `short()`
//! form (first 8 hex chars) is for human-facing output only, never a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block identifier (UUIDv7).
///
/// Assigned once when the block is created and never reused after deletion.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(uuid::Uuid);

/// An editor instance identifier (UUIDv7), one per mounted manager.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// First 8 hex characters. Human display only, never a lookup key.
            pub fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            /// Reconstruct from 16 bytes.
            pub fn from_bytes(b: [u8; 16]) -> Self {
                Self(uuid::Uuid::from_bytes(b))
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $T {
            fn from(u: uuid::Uuid) -> Self {
                Self(u)
            }
        }

        impl From<$T> for uuid::Uuid {
            fn from(id: $T) -> uuid::Uuid {
                id.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Full UUID with hyphens for log readability
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(BlockId, "BlockId");
impl_typed_id!(EditorId, "EditorId");

impl BlockId {
    /// Deterministic ID from a sequence number.
    ///
    /// Used by sequential generators (replay, tests) where stable output
    /// matters more than global uniqueness.
    pub fn from_seq(seq: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[8..].copy_from_slice(&seq.to_be_bytes());
        Self::from_bytes(bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_distinct() {
        let a = BlockId::new();
        let b = BlockId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_is_hex_prefix() {
        let id = BlockId::new();
        assert_eq!(id.short().len(), 8);
        assert!(id.to_string().starts_with(&id.short()));
    }

    #[test]
    fn test_from_seq_is_stable_and_ordered() {
        assert_eq!(BlockId::from_seq(7), BlockId::from_seq(7));
        assert!(BlockId::from_seq(1) < BlockId::from_seq(2));
        assert_eq!(
            BlockId::from_seq(1).to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
    }

    #[test]
    fn test_debug_format() {
        let id = BlockId::new();
        let debug = format!("{:?}", id);
        assert!(debug.starts_with("BlockId("));
        assert!(debug.contains(&id.short()));
    }

    #[test]
    fn test_serde_transparent() {
        let id = BlockId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
