//! Request body construction.
//!
//! Turns a [`RequestDescriptor`] into the JSON body for the chat endpoint:
//! memory context is prepended to the user prompt, the message list is laid
//! out for the model's family, and the `stream` / `think` fields are added
//! as the descriptor asks. `serde_json` handles all escaping.

use aichat_core::diagnostics::DiagnosticSink;
use aichat_core::memory::MemoryContext;
use aichat_core::types::{ChatRequestBody, RequestDescriptor};

use crate::family;

/// Marker separating the memory context from the current turn.
pub const CURRENT_INPUT_MARKER: &str = "【Current Input】";

/// Prepend the memory context (if any) to `user_prompt`.
///
/// Blank context leaves the prompt unchanged.
pub fn inject_memory(
    memory: Option<&dyn MemoryContext>,
    user_prompt: &str,
    sink: &dyn DiagnosticSink,
    header: &str,
) -> String {
    let Some(memory) = memory else {
        return user_prompt.to_string();
    };

    let context = memory.get_context();
    sink.info(&format!(
        "[{header}] [Memory] current stats:\n{}",
        memory.memory_stats_summary()
    ));

    if context.trim().is_empty() {
        user_prompt.to_string()
    } else {
        format!("{context}\n\n{CURRENT_INPUT_MARKER}\n{user_prompt}")
    }
}

/// Build the typed request body for one turn.
pub fn build_request(descriptor: &RequestDescriptor, sink: &dyn DiagnosticSink) -> ChatRequestBody {
    let header = descriptor.log_header.as_str();
    let user_prompt = inject_memory(
        descriptor.memory.as_deref(),
        &descriptor.user_prompt,
        sink,
        header,
    );

    let family = family::classify(&descriptor.model_name);
    let messages = family.compose(&descriptor.system_prompt, &user_prompt);

    sink.info(&format!(
        "[{header}] [Memory] enabled: {}",
        descriptor.memory.is_some()
    ));

    if descriptor.log_request_body {
        sink.info(&format!(
            "[{header}] [Full prompt]\n========================================\n\
             [System Prompt]\n{}\n\n[User Content]\n{user_prompt}\n\
             ========================================",
            descriptor.system_prompt
        ));
    }

    ChatRequestBody {
        model: descriptor.model_name.clone(),
        messages,
        stream: descriptor.use_local_provider.then_some(false),
        think: descriptor.think_mode.as_field(),
    }
}

/// Build the serialized JSON body for one turn.
///
/// Never fails: a body that somehow can't be serialized is logged and
/// replaced by `{}`.
pub fn build_request_body(descriptor: &RequestDescriptor, sink: &dyn DiagnosticSink) -> String {
    let request = build_request(descriptor, sink);
    let body = match serde_json::to_string(&request) {
        Ok(body) => body,
        Err(e) => {
            sink.error(&format!(
                "[{}] failed to serialize request body: {e}",
                descriptor.log_header
            ));
            "{}".to_string()
        }
    };

    if descriptor.log_request_body {
        sink.info(&format!(
            "[{}] [API request] full body:\n{body}",
            descriptor.log_header
        ));
    }

    body
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use aichat_core::diagnostics::{Level, NoopSink, RecordingSink};
    use aichat_core::memory::{NoMemory, StaticMemory};
    use aichat_core::types::ThinkMode;
    use serde_json::Value;
    use std::sync::Arc;

    fn descriptor(model: &str) -> RequestDescriptor {
        RequestDescriptor::new("http://127.0.0.1:11434/api/chat", model)
            .with_prompts("You are Satone.", "hello")
    }

    fn body_json(d: &RequestDescriptor) -> Value {
        serde_json::from_str(&build_request_body(d, &NoopSink)).unwrap()
    }

    #[test]
    fn test_system_role_layout() {
        let json = body_json(&descriptor("llama3"));
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You are Satone.");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "hello");
        assert_eq!(json["model"], "llama3");
    }

    #[test]
    fn test_fold_in_layout() {
        let json = body_json(&descriptor("gemma2:9b"));
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        let content = messages[0]["content"].as_str().unwrap();
        assert_eq!(
            content,
            "[System Instruction]\nYou are Satone.\n\n[User Message]\nhello"
        );
    }

    #[test]
    fn test_think_field_states() {
        let enabled = body_json(&descriptor("llama3").with_think_mode(ThinkMode::Enabled));
        assert_eq!(enabled["think"], Value::Bool(true));

        let disabled = body_json(&descriptor("llama3").with_think_mode(ThinkMode::Disabled));
        assert_eq!(disabled["think"], Value::Bool(false));

        let default = body_json(&descriptor("llama3"));
        assert!(default.get("think").is_none());
    }

    #[test]
    fn test_stream_only_for_local_provider() {
        let local = body_json(&descriptor("llama3").with_local_provider(true));
        assert_eq!(local["stream"], Value::Bool(false));

        let hosted = body_json(&descriptor("llama3"));
        assert!(hosted.get("stream").is_none());
    }

    #[test]
    fn test_memory_context_prepended() {
        let d = descriptor("llama3").with_memory(StaticMemory::shared("User likes tea."));
        let json = body_json(&d);
        assert_eq!(
            json["messages"][1]["content"],
            "User likes tea.\n\n【Current Input】\nhello"
        );
        // Persona untouched
        assert_eq!(json["messages"][0]["content"], "You are Satone.");
    }

    #[test]
    fn test_memory_context_in_fold_in_layout() {
        let d = descriptor("gemma:2b").with_memory(StaticMemory::shared("ctx"));
        let json = body_json(&d);
        let content = json["messages"][0]["content"].as_str().unwrap();
        assert!(content.ends_with("[User Message]\nctx\n\n【Current Input】\nhello"));
    }

    #[test]
    fn test_blank_memory_leaves_prompt() {
        let d = descriptor("llama3").with_memory(StaticMemory::shared("  \n\t "));
        assert_eq!(body_json(&d)["messages"][1]["content"], "hello");

        let d = descriptor("llama3").with_memory(Arc::new(NoMemory));
        assert_eq!(body_json(&d)["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_escaping_produces_valid_json() {
        let tricky = "quote \" backslash \\ newline \n tab \t bell \u{7} 你好";
        let d = RequestDescriptor::new("http://h/api/chat", "llama3").with_prompts(tricky, tricky);
        let raw = build_request_body(&d, &NoopSink);
        assert!(!raw.contains('\n'));
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["messages"][0]["content"], tricky);
        assert_eq!(json["messages"][1]["content"], tricky);
    }

    #[test]
    fn test_empty_model_still_builds() {
        let json = body_json(&RequestDescriptor::new("http://h", ""));
        assert_eq!(json["model"], "");
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_log_request_body_does_not_change_output() {
        let quiet = descriptor("llama3").with_think_mode(ThinkMode::Enabled);
        let loud = quiet.clone().with_log_request_body(true);

        let sink = RecordingSink::new();
        let with_log = build_request_body(&loud, sink.as_ref());
        let without_log = build_request_body(&quiet, &NoopSink);

        assert_eq!(with_log, without_log);
        assert!(sink.contains("[API request] full body"));
        assert!(sink.contains(&with_log));
        assert!(sink.contains("[System Prompt]\nYou are Satone."));
    }

    #[test]
    fn test_body_not_logged_by_default() {
        let sink = RecordingSink::new();
        build_request_body(&descriptor("llama3"), sink.as_ref());
        assert!(!sink.contains("full body"));
        assert!(sink.contains("[LLMRequest] [Memory] enabled: false"));
    }

    #[test]
    fn test_memory_stats_logged() {
        let sink = RecordingSink::new();
        let d = descriptor("llama3").with_memory(StaticMemory::shared("abc"));
        build_request_body(&d, sink.as_ref());
        let info = sink.at(Level::Info);
        assert!(info.iter().any(|m| m.contains("static context: 3 chars")));
        assert!(info.iter().any(|m| m.contains("enabled: true")));
    }
}
