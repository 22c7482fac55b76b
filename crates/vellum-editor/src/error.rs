//! Error types for the editor subsystem.
//!
//! None of these reach the surrounding form. Host failures are caught by the
//! surface, logged, and ignored; config errors only arise when loading an
//! [`EditorConfig`](crate::EditorConfig) from disk.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`RichTextHost`](crate::RichTextHost).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A saved selection no longer resolves to a position in the region.
    #[error("saved selection no longer resolves")]
    SelectionExpired,

    /// The platform declined to run a native command.
    #[error("command {command} rejected: {reason}")]
    CommandRejected { command: String, reason: String },

    /// The editable region is gone (torn down or never attached).
    #[error("editable region is detached")]
    Detached,
}

/// Errors from editor configuration.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
