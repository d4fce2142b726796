//! `aichat init` — write a default config and the data directories.
//!
//! - Creates `~/.aichat/config.json` with defaults (never overwrites)
//! - Creates `~/.aichat/history/`

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use aichat_core::config::{get_config_path, save_config, Config};
use aichat_core::utils::get_history_path;

/// Run the init command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "💬 AIChat — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    if let Some(history_dir) = get_history_path().parent() {
        std::fs::create_dir_all(history_dir)
            .with_context(|| format!("failed to create {}", history_dir.display()))?;
        println!("  {} history dir at {}", "✓".green(), history_dir.display());
    }

    println!();
    println!(
        "{}",
        "  Setup complete! Edit the config, then run `aichat chat`.".green()
    );
    println!();

    Ok(())
}

/// Write a default config to `path` unless one exists. Returns whether a
/// file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
