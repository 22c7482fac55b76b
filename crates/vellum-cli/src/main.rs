//! vellum - offline tooling for block documents.
//!
//! ## Usage
//!
//! ```bash
//! # Print the cleaned HTML a form would persist
//! vellum clean post.json
//!
//! # Replay a scripted editing session, printing each emitted document
//! vellum replay post.json session.ron
//!
//! # List toolbar buttons and keyboard shortcuts
//! vellum toolbar
//! ```
//!
//! Documents are JSON arrays of `{"content": "<p>...</p>"}` records.

mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
use vellum_editor::{EditorConfig, HISTORY_BUTTONS, KeyChord, TOOLBAR, ToolbarButton, shortcut};
use vellum_types::Document;

use crate::session::Session;

/// Offline tooling for vellum block documents.
#[derive(Parser, Debug)]
#[command(name = "vellum")]
#[command(about = "Clean documents, replay editing sessions, list the toolbar")]
struct Args {
    /// Editor config (RON); timings and breakpoint fall back to defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cleaned, concatenated HTML of a document
    Clean {
        /// Document JSON file
        document: PathBuf,
    },
    /// Replay a session script and print every emitted document as a JSON line
    Replay {
        /// Initial document JSON file
        document: PathBuf,
        /// Session script (RON)
        session: PathBuf,
    },
    /// Print the toolbar catalog and keyboard shortcuts
    Toolbar,
}

fn read_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    Document::from_json(&text).with_context(|| format!("invalid document {}", path.display()))
}

fn print_buttons(buttons: &[ToolbarButton]) {
    for b in buttons {
        println!("  {:<8} {:<14} {:<8} {}", b.group, b.key, b.label, b.title);
    }
}

fn print_toolbar() {
    println!("Toolbar:");
    print_buttons(TOOLBAR);
    println!("\nBlock controls:");
    print_buttons(HISTORY_BUTTONS);

    println!("\nShortcuts (Ctrl or Cmd):");
    for key in ['z', 'y', 'e', 'l', 'r'] {
        for chord in [KeyChord::ctrl(key), KeyChord::ctrl(key).with_shift()] {
            if chord.shift && shortcut(&chord) == shortcut(&KeyChord::ctrl(key)) {
                continue;
            }
            if let Some(command) = shortcut(&chord) {
                let shift = if chord.shift { "Shift+" } else { "" };
                println!("  {shift}{:<8} {command:?}", key.to_ascii_uppercase());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match args.command {
        Command::Clean { document } => {
            let document = read_document(&document)?;
            let cleaned = document.cleaned_html();
            if cleaned.is_empty() {
                bail!("Content is required");
            }
            println!("{cleaned}");
        }
        Command::Replay {
            document,
            session: script_path,
        } => {
            let document = read_document(&document)?;
            let script = std::fs::read_to_string(&script_path)
                .with_context(|| format!("failed to read session {}", script_path.display()))?;
            let script = Session::from_ron_str(&script)?;

            tracing::info!(blocks = document.len(), ops = script.ops.len(), "replaying session");
            for emitted in session::replay(document, &script, config).await {
                println!("{}", emitted.to_json());
            }
        }
        Command::Toolbar => print_toolbar(),
    }

    Ok(())
}
