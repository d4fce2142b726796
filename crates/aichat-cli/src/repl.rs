//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history.
//! Each line is one chat turn; the next prompt appears only after the reply
//! (or failure) has been printed.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use aichat_core::config::Config;
use aichat_core::memory::MemoryContext;
use aichat_core::types::StructuredReply;
use aichat_core::utils::get_history_path;
use aichat_providers::{DispatchError, ReplyProvider};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

// ─────────────────────────────────────────────
// ChatSession
// ─────────────────────────────────────────────

/// A provider plus the config every turn is built from.
pub struct ChatSession {
    provider: Arc<dyn ReplyProvider>,
    config: Config,
    memory: Option<Arc<dyn MemoryContext>>,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn ReplyProvider>,
        config: Config,
        memory: Option<Arc<dyn MemoryContext>>,
    ) -> Self {
        Self {
            provider,
            config,
            memory,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.llm.model
    }

    /// Run one chat turn.
    pub async fn turn(&self, input: &str) -> Result<StructuredReply, DispatchError> {
        let descriptor = self.config.to_descriptor(input, self.memory.clone());
        debug!(provider = self.provider.display_name(), "sending turn");
        self.provider.reply(&descriptor).await
    }

    /// Run one turn and print the outcome.
    pub async fn turn_and_print(&self, input: &str) -> Result<StructuredReply, DispatchError> {
        let outcome = self.turn(input).await;
        match &outcome {
            Ok(reply) => helpers::print_reply(reply),
            Err(e) => helpers::print_failure(&e.to_string(), e.code()),
        }
        outcome
    }
}

// ─────────────────────────────────────────────
// REPL loop
// ─────────────────────────────────────────────

/// Run the interactive REPL loop.
pub async fn run(session: ChatSession) -> Result<()> {
    helpers::print_banner(session.model());

    let history_path = get_history_path();
    let mut editor = create_editor(&history_path)?;

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ctrl-C
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                // Ctrl-D
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_exit_command(trimmed) {
            println!("\nさようなら! 👋");
            break;
        }

        let _ = editor.add_history_entry(&input);

        helpers::print_thinking();
        let outcome = session.turn(trimmed).await;
        helpers::clear_thinking();

        match outcome {
            Ok(reply) => helpers::print_reply(&reply),
            Err(e) => helpers::print_failure(&e.to_string(), e.code()),
        }
    }

    save_history(&mut editor, &history_path);

    Ok(())
}

/// Create a rustyline editor with history.
fn create_editor(history_path: &Path) -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    if history_path.exists() {
        let _ = editor.load_history(history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>, path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(path) {
        debug!("failed to save history: {e}");
    }
}

/// Check if input is an exit command.
fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
