//! Config loader — reads `~/.aichat/config.json`, merges env vars, and
//! applies legacy migrations.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.aichat/config.json`
//! 3. Environment variables `AICHAT_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let mut raw: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    migrate_config(&mut raw);

    let config: Config = match serde_json::from_value(raw) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to deserialize config: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply legacy config migrations.
///
/// Renames `llm.useLocalOllama` → `llm.useLocalProvider` and
/// `llm.modelName` → `llm.model` unless the new key is already set.
fn migrate_config(raw: &mut serde_json::Value) {
    let Some(llm) = raw.get_mut("llm").and_then(|v| v.as_object_mut()) else {
        return;
    };

    for (legacy, current) in [("useLocalOllama", "useLocalProvider"), ("modelName", "model")] {
        if let Some(val) = llm.remove(legacy) {
            if !llm.contains_key(current) {
                llm.insert(current.to_string(), val);
                debug!("Migrated llm.{legacy} → llm.{current}");
            }
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `AICHAT_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `AICHAT_LLM__API_URL`, `AICHAT_LLM__API_KEY`, `AICHAT_LLM__MODEL`
/// - `AICHAT_LLM__USE_LOCAL_PROVIDER`, `AICHAT_LLM__THINK_MODE`
/// - `AICHAT_LLM__FIX_API_PATH_FOR_THINK_MODE`, `AICHAT_LLM__LOG_REQUEST_BODY`
/// - `AICHAT_LLM__TIMEOUT_SECS`, `AICHAT_LLM__LOG_HEADER`
/// - `AICHAT_PERSONA__SYSTEM_PROMPT`
fn apply_env_overrides(mut config: Config) -> Config {
    let llm = &mut config.llm;

    if let Ok(val) = std::env::var("AICHAT_LLM__API_URL") {
        llm.api_url = val;
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__API_KEY") {
        llm.api_key = val;
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__MODEL") {
        llm.model = val;
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__USE_LOCAL_PROVIDER") {
        llm.use_local_provider = parse_flag(&val);
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__THINK_MODE") {
        match val.parse() {
            Ok(mode) => llm.think_mode = mode,
            Err(e) => warn!("Ignoring AICHAT_LLM__THINK_MODE: {e}"),
        }
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__FIX_API_PATH_FOR_THINK_MODE") {
        llm.fix_api_path_for_think_mode = parse_flag(&val);
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__LOG_REQUEST_BODY") {
        llm.log_request_body = parse_flag(&val);
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            llm.timeout_secs = n;
        }
    }
    if let Ok(val) = std::env::var("AICHAT_LLM__LOG_HEADER") {
        llm.log_header = val;
    }

    if let Ok(val) = std::env::var("AICHAT_PERSONA__SYSTEM_PROMPT") {
        config.persona.system_prompt = val;
    }

    config
}

fn parse_flag(val: &str) -> bool {
    val == "true" || val == "1"
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
