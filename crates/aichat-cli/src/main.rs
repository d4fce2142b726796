//! AIChat CLI — entry point.
//!
//! # Commands
//!
//! - `aichat chat [-m MESSAGE] [--memory FILE] [--logs]` — single turn or interactive REPL
//! - `aichat init` — write a default config
//! - `aichat status` — show configuration and the effective request setup

mod helpers;
mod init;
mod repl;
mod status;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use aichat_core::config::{load_config, Config};
use aichat_core::diagnostics::{DiagnosticSink, TracingSink};
use aichat_core::memory::{MemoryContext, StaticMemory};
use aichat_providers::ChatDispatcher;

use crate::repl::ChatSession;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 💬 AIChat — emotion-tagged chat with a local or hosted LLM
#[derive(Parser)]
#[command(name = "aichat", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the model (single message or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Text file whose contents are sent as memory context each turn
        #[arg(long)]
        memory: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default config file
    Init,

    /// Show configuration and the effective request setup
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            memory,
            logs,
        } => {
            init_logging(logs);
            run_chat(message, memory).await
        }
        Commands::Init => init::run().map(|()| ExitCode::SUCCESS),
        Commands::Status => status::run().map(|()| ExitCode::SUCCESS),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>, memory_file: Option<String>) -> Result<ExitCode> {
    let config = prepare_config(load_config(None));
    let memory = memory_file
        .map(|path| load_memory(&helpers::expand_tilde(&path)))
        .transpose()?;

    let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
    let dispatcher = ChatDispatcher::from_config(&config.llm, sink)
        .context("failed to create chat dispatcher")?;
    info!(
        model = %config.llm.model,
        endpoint = %config.llm.api_url,
        timeout = ?dispatcher.timeout(),
        "chat dispatcher ready"
    );

    let session = ChatSession::new(Arc::new(dispatcher), config, memory);

    match message {
        Some(msg) => Ok(run_single_shot(&session, &msg).await),
        None => {
            repl::run(session).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// One turn, printed once. A failed turn exits non-zero.
async fn run_single_shot(session: &ChatSession, message: &str) -> ExitCode {
    match session.turn_and_print(message).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Fill in the built-in persona when none is configured.
fn prepare_config(mut config: Config) -> Config {
    let persona = helpers::resolve_persona(&config).to_string();
    config.persona.system_prompt = persona;
    config
}

/// Read a memory context file.
fn load_memory(path: &Path) -> Result<Arc<dyn MemoryContext>> {
    let context = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read memory file {}", path.display()))?;
    Ok(StaticMemory::shared(context))
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("aichat=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
