//! # vellum-editor
//!
//! Block-based rich-text editing for a form field.
//!
//! The form hands the editor a [`Document`](vellum_types::Document) once, on
//! mount. From then on editing is internal:
//! - [`BlockManager`] owns the ordered blocks and emits the document back to
//!   the form after each quiet period
//! - [`BlockSurface`] drives one block's editable region: activation, typed
//!   input, formatting commands, and the formatting-state snapshot
//! - [`Editor`] keeps one mounted surface per block
//! - [`RichTextHost`] is the platform seam; [`memory::MemoryHost`] implements
//!   it headlessly for replay and tests
//!
//! Timers are Tokio tasks, so the editor lives inside a Tokio runtime.

pub mod command;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod host;
pub mod id_gen;
pub mod layout;
pub mod manager;
pub mod memory;
pub mod surface;

pub use command::{
    CommandPlan, FormatCommand, HISTORY_BUTTONS, KeyChord, TOOLBAR, ToolbarButton, ToolbarGroup, plan,
    shortcut,
};
pub use config::EditorConfig;
pub use debounce::Debouncer;
pub use editor::Editor;
pub use error::{EditorError, HostError};
pub use host::{CommandState, ElementInfo, HostFactory, NativeCommand, NoPrompt, RichTextHost, UrlPrompt};
pub use id_gen::{IdGenerator, SequentialIds, UuidIds};
pub use layout::Layout;
pub use manager::{BlockBinding, BlockManager, DocumentSink};
pub use surface::BlockSurface;
