//! Core types for AIChat — the request descriptor, wire messages and the
//! structured reply handed to the presentation layer.
//!
//! The wire types model the chat completions body accepted by both the
//! Ollama-native `/api/chat` endpoint and OpenAI-compatible endpoints.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::memory::MemoryContext;

/// Log header used when the caller doesn't provide one.
pub const DEFAULT_LOG_HEADER: &str = "LLMRequest";

/// Emotion tag reported when the assistant text doesn't follow the
/// `[Emotion] ||| voice ||| subtitle` contract.
pub const FALLBACK_EMOTION: &str = "Think";

// ─────────────────────────────────────────────
// Think mode
// ─────────────────────────────────────────────

/// Tri-state switch for the `think` (extended reasoning) request field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkMode {
    /// Omit the field; the provider default applies.
    #[default]
    Default,
    /// Send `"think": true`.
    #[serde(alias = "enable")]
    Enabled,
    /// Send `"think": false`.
    #[serde(alias = "disable")]
    Disabled,
}

impl ThinkMode {
    /// Value of the `think` field, or `None` when it must be omitted.
    pub fn as_field(self) -> Option<bool> {
        match self {
            ThinkMode::Default => None,
            ThinkMode::Enabled => Some(true),
            ThinkMode::Disabled => Some(false),
        }
    }
}

impl std::str::FromStr for ThinkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "" => Ok(ThinkMode::Default),
            "enabled" | "enable" | "true" | "on" => Ok(ThinkMode::Enabled),
            "disabled" | "disable" | "false" | "off" => Ok(ThinkMode::Disabled),
            other => Err(format!("unknown think mode '{other}'")),
        }
    }
}

impl std::fmt::Display for ThinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ThinkMode::Default => "default",
            ThinkMode::Enabled => "enabled",
            ThinkMode::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

// ─────────────────────────────────────────────
// Request descriptor
// ─────────────────────────────────────────────

/// Everything needed to dispatch one chat turn.
///
/// Built per call by the caller and never mutated afterwards. The memory
/// provider is shared, so cloning a descriptor is cheap.
#[derive(Clone)]
pub struct RequestDescriptor {
    /// Endpoint URL (e.g. `http://127.0.0.1:11434/api/chat`).
    pub endpoint: String,
    /// Bearer credential for hosted providers.
    pub api_key: Option<String>,
    /// Provider model identifier (e.g. `"llama3"`, `"gemma2:9b"`).
    pub model_name: String,
    /// Persona / instructions.
    pub system_prompt: String,
    /// The turn's input.
    pub user_prompt: String,
    /// Local (Ollama-style) provider instead of a hosted OpenAI-compatible one.
    pub use_local_provider: bool,
    pub think_mode: ThinkMode,
    /// Rolling conversational context, prepended to the user prompt.
    pub memory: Option<Arc<dyn MemoryContext>>,
    /// Dump the full request body to the diagnostic sink.
    pub log_request_body: bool,
    /// Switch OpenAI-compatible paths to the native chat path when a think mode is set.
    pub rewrite_endpoint_for_reasoning: bool,
    /// Prefix tag for every log line of this dispatch.
    pub log_header: String,
}

impl RequestDescriptor {
    /// Create a descriptor with the required endpoint and model; everything else defaulted.
    pub fn new(endpoint: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            model_name: model_name.into(),
            system_prompt: String::new(),
            user_prompt: String::new(),
            use_local_provider: false,
            think_mode: ThinkMode::Default,
            memory: None,
            log_request_body: false,
            rewrite_endpoint_for_reasoning: false,
            log_header: DEFAULT_LOG_HEADER.to_string(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    pub fn with_prompts(
        mut self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        self.system_prompt = system_prompt.into();
        self.user_prompt = user_prompt.into();
        self
    }

    pub fn with_local_provider(mut self, local: bool) -> Self {
        self.use_local_provider = local;
        self
    }

    pub fn with_think_mode(mut self, mode: ThinkMode) -> Self {
        self.think_mode = mode;
        self
    }

    pub fn with_memory(mut self, memory: Arc<dyn MemoryContext>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_log_request_body(mut self, enabled: bool) -> Self {
        self.log_request_body = enabled;
        self
    }

    pub fn with_endpoint_rewrite(mut self, enabled: bool) -> Self {
        self.rewrite_endpoint_for_reasoning = enabled;
        self
    }

    pub fn with_log_header(mut self, header: impl Into<String>) -> Self {
        self.log_header = header.into();
        self
    }

    /// The API key if one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("use_local_provider", &self.use_local_provider)
            .field("think_mode", &self.think_mode)
            .field("memory", &self.memory.is_some())
            .field("log_request_body", &self.log_request_body)
            .field("rewrite_endpoint_for_reasoning", &self.rewrite_endpoint_for_reasoning)
            .field("log_header", &self.log_header)
            .finish()
    }
}

// ─────────────────────────────────────────────
// Wire messages
// ─────────────────────────────────────────────

/// A chat message in the request body. Each variant maps to a `role` value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::User { .. } => "user",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System { content } | Message::User { content } => content,
        }
    }
}

/// Request body for a chat endpoint.
///
/// Field order on the wire is `model, messages, stream, think`.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequestBody {
    pub model: String,
    pub messages: Vec<Message>,
    /// Only sent to local providers, always `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub think: Option<bool>,
}

// ─────────────────────────────────────────────
// Structured reply
// ─────────────────────────────────────────────

/// The `{emotion, voice, subtitle}` triple the presentation layer consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    /// Whether the assistant text followed the three-part contract.
    pub ok: bool,
    /// Emotion / action tag without brackets, e.g. `"Happy"`.
    pub emotion_tag: String,
    /// Text for speech synthesis.
    pub voice_text: String,
    /// Text for subtitles. Holds the whole raw text when `ok` is false.
    pub subtitle_text: String,
}

impl StructuredReply {
    /// A well-formed reply.
    pub fn new(
        emotion_tag: impl Into<String>,
        voice_text: impl Into<String>,
        subtitle_text: impl Into<String>,
    ) -> Self {
        Self {
            ok: true,
            emotion_tag: emotion_tag.into(),
            voice_text: voice_text.into(),
            subtitle_text: subtitle_text.into(),
        }
    }

    /// The degraded reply for text that doesn't parse: raw text as subtitle.
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self {
            ok: false,
            emotion_tag: FALLBACK_EMOTION.to_string(),
            voice_text: String::new(),
            subtitle_text: raw.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
