//! Utility helpers — path resolution, timestamps, string manipulation.

use std::path::PathBuf;

/// Get the AIChat data directory (e.g. `~/.aichat/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".aichat")
}

/// Get the REPL history file (e.g. `~/.aichat/history/cli_history`).
pub fn get_history_path() -> PathBuf {
    get_data_path().join("history").join("cli_history")
}

/// Get current local time as `HH:MM:SS.mmm`, used to stamp request starts.
pub fn clock_time() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
