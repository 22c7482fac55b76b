//! Scripted editing sessions, replayed against the in-memory host.
//!
//! A session is a RON list of operations applied in order to an editor
//! initialized from a document:
//!
//! ```ron
//! (
//!     ops: [
//!         Add,
//!         Type(1, "World"),
//!         Format(1, Heading(2)),
//!         MoveUp(1),
//!         Wait(250),
//!     ],
//! )
//! ```
//!
//! Indices address blocks by their position at the time the op runs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use vellum_editor::memory::{MemoryHostFactory, ScriptedPrompt};
use vellum_editor::{Editor, EditorConfig, FormatCommand, NoPrompt, SequentialIds};
use vellum_types::{BlockId, Document};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionOp {
    /// Append an empty block.
    Add,
    Delete(usize),
    /// Replace a block's content programmatically.
    Update(usize, String),
    MoveUp(usize),
    MoveDown(usize),
    /// Click into a block and type at the end of its text.
    Type(usize, String),
    /// Click into a block and apply a toolbar command.
    Format(usize, FormatCommand),
    /// Click into a block and link the selection, answering the prompt with the URL.
    Link(usize, String),
    /// Let time pass, in milliseconds.
    Wait(u64),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub ops: Vec<SessionOp>,
}

impl Session {
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).context("invalid session script")
    }
}

type Emitted = Arc<Mutex<Vec<Document>>>;

struct Replay {
    editor: Editor<MemoryHostFactory>,
    hosts: MemoryHostFactory,
}

impl Replay {
    fn block_at(&self, index: usize, op: &SessionOp) -> Option<BlockId> {
        let id = self.editor.manager().block_ids().get(index).copied();
        if id.is_none() {
            tracing::warn!(index, ?op, "no block at index; op skipped");
        }
        id
    }

    /// Click into `id` the way a user would before acting on it.
    fn click(&self, id: BlockId) {
        if let Some(host) = self.hosts.host(id) {
            host.click();
        }
        self.editor.click(id);
    }

    async fn run(&mut self, op: &SessionOp) {
        tracing::debug!(?op, "replaying");
        match op {
            SessionOp::Add => {
                self.editor.add_block();
            }
            SessionOp::Delete(index) => {
                if let Some(id) = self.block_at(*index, op) {
                    self.editor.delete_block(id);
                }
            }
            SessionOp::Update(index, content) => {
                if let Some(id) = self.block_at(*index, op) {
                    self.editor.reset_block(id, content);
                }
            }
            SessionOp::MoveUp(index) => {
                self.editor.move_up(*index);
            }
            SessionOp::MoveDown(index) => {
                self.editor.move_down(*index);
            }
            SessionOp::Type(index, text) => {
                if let Some(id) = self.block_at(*index, op) {
                    self.click(id);
                    if let (Some(host), Some(surface)) = (self.hosts.host(id), self.editor.surface(id)) {
                        host.type_text(text);
                        surface.on_input();
                    }
                }
            }
            SessionOp::Format(index, command) => {
                if let Some(id) = self.block_at(*index, op) {
                    self.click(id);
                    self.editor.apply(id, *command, &mut NoPrompt);
                }
            }
            SessionOp::Link(index, url) => {
                if let Some(id) = self.block_at(*index, op) {
                    self.click(id);
                    let mut prompt = ScriptedPrompt::new().answer(url.as_str());
                    self.editor.apply(id, FormatCommand::Link, &mut prompt);
                }
            }
            SessionOp::Wait(ms) => tokio::time::sleep(Duration::from_millis(*ms)).await,
        }
    }
}

/// Run `session` against `document` and collect every document the form
/// would have received, ending with the settled final state.
pub async fn replay(document: Document, session: &Session, config: EditorConfig) -> Vec<Document> {
    let emitted: Emitted = Arc::new(Mutex::new(Vec::new()));
    let sink = emitted.clone();
    let hosts = MemoryHostFactory::new();

    // Everything pending settles within one pass of each timer
    let settle = config.input_debounce() + config.command_settle() + config.sync_debounce();

    let editor = Editor::with_id_generator(
        document,
        move |doc: Document| sink.lock().push(doc),
        hosts.clone(),
        config,
        Box::new(SequentialIds::new()),
    );
    let mut replay = Replay { editor, hosts };

    for op in &session.ops {
        replay.run(op).await;
    }

    tokio::time::sleep(settle).await;
    replay.editor.flush();
    tracing::info!(ops = session.ops.len(), blocks = replay.editor.len(), "replay finished");

    drop(replay);
    emitted.lock().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session() {
        let session = Session::from_ron_str(
            r#"(ops: [Add, Type(0, "Hi"), Format(0, Heading(1)), Link(0, "https://x.example"), Wait(10)])"#,
        )
        .unwrap();
        assert_eq!(session.ops.len(), 5);
        assert_eq!(session.ops[2], SessionOp::Format(0, FormatCommand::Heading(1)));
    }

    #[test]
    fn test_bad_session_is_an_error() {
        assert!(Session::from_ron_str("(ops: [Explode])").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_add_and_move_up() {
        let session = Session {
            ops: vec![SessionOp::Add, SessionOp::MoveUp(1)],
        };
        let emitted = replay(
            Document::from(vec!["<p>Hello</p>"]),
            &session,
            EditorConfig::default(),
        )
        .await;
        assert_eq!(emitted.len(), 1);
        assert_eq!(
            emitted[0].to_json(),
            r#"[{"content":"<p><br/></p>"},{"content":"<p>Hello</p>"}]"#
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_typing_and_formatting() {
        let session = Session {
            ops: vec![
                SessionOp::Type(0, "Title".into()),
                SessionOp::Wait(400),
                SessionOp::Format(0, FormatCommand::Heading(1)),
            ],
        };
        let emitted = replay(Document::new(), &session, EditorConfig::default()).await;
        assert_eq!(emitted.last(), Some(&Document::from(vec!["<h1>Title</h1>"])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_ops_are_skipped() {
        let session = Session {
            ops: vec![SessionOp::Delete(5), SessionOp::Update(9, "<p>x</p>".into())],
        };
        let emitted = replay(Document::from(vec!["<p>A</p>"]), &session, EditorConfig::default()).await;
        assert!(emitted.is_empty());
    }
}
