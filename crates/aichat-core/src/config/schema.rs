//! Configuration schema.
//!
//! Hierarchy: `Config` → `LlmConfig`, `PersonaConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::memory::MemoryContext;
use crate::types::{RequestDescriptor, ThinkMode};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.aichat/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub llm: LlmConfig,
    pub persona: PersonaConfig,
}

impl Config {
    /// Build the descriptor for one turn from this config.
    pub fn to_descriptor(
        &self,
        user_prompt: impl Into<String>,
        memory: Option<Arc<dyn MemoryContext>>,
    ) -> RequestDescriptor {
        let llm = &self.llm;
        let mut descriptor = RequestDescriptor::new(&llm.api_url, &llm.model)
            .with_api_key(&llm.api_key)
            .with_prompts(&self.persona.system_prompt, user_prompt)
            .with_local_provider(llm.use_local_provider)
            .with_think_mode(llm.think_mode)
            .with_log_request_body(llm.log_request_body)
            .with_endpoint_rewrite(llm.fix_api_path_for_think_mode)
            .with_log_header(&llm.log_header);
        if let Some(memory) = memory {
            descriptor = descriptor.with_memory(memory);
        }
        descriptor
    }
}

// ─────────────────────────────────────────────
// LLM endpoint
// ─────────────────────────────────────────────

/// Endpoint and request settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmConfig {
    /// Chat endpoint URL.
    pub api_url: String,
    /// API key for hosted providers. Empty = none.
    #[serde(default)]
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Talk to a local Ollama-style provider (`stream: false`, native envelope).
    pub use_local_provider: bool,
    /// `default` | `enabled` | `disabled`.
    pub think_mode: ThinkMode,
    /// Rewrite `/v1/chat/completions` to `/api/chat` when a think mode is set.
    pub fix_api_path_for_think_mode: bool,
    /// Log the full request body of every call.
    pub log_request_body: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Prefix tag for request log lines.
    pub log_header: String,
}

impl LlmConfig {
    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:11434/api/chat".to_string(),
            api_key: String::new(),
            model: "llama3".to_string(),
            use_local_provider: true,
            think_mode: ThinkMode::Default,
            fix_api_path_for_think_mode: true,
            log_request_body: false,
            timeout_secs: 30,
            log_header: "AIChatConsole".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────

/// Persona settings. An empty prompt means "use the built-in persona".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonaConfig {
    pub system_prompt: String,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
