//! Endpoint resolution for think mode.
//!
//! Ollama only honors the `think` field on its native `/api/chat` endpoint,
//! not on the OpenAI-compatible shim. When rewriting is enabled and a think
//! mode is set, OpenAI-compatible paths are switched to the native one.

use aichat_core::types::ThinkMode;

/// OpenAI-compatible chat completions path.
pub const OPENAI_COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// Ollama-native chat path.
pub const NATIVE_CHAT_PATH: &str = "/api/chat";

/// Effective endpoint URL for a request.
pub fn resolve_endpoint(base_url: &str, think_mode: ThinkMode, rewrite_enabled: bool) -> String {
    if rewrite_enabled
        && think_mode != ThinkMode::Default
        && base_url.contains(OPENAI_COMPLETIONS_PATH)
    {
        return base_url.replace(OPENAI_COMPLETIONS_PATH, NATIVE_CHAT_PATH);
    }
    base_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPAT: &str = "http://h/v1/chat/completions";

    #[test]
    fn rewrites_when_think_mode_set() {
        assert_eq!(resolve_endpoint(COMPAT, ThinkMode::Enabled, true), "http://h/api/chat");
        assert_eq!(resolve_endpoint(COMPAT, ThinkMode::Disabled, true), "http://h/api/chat");
    }

    #[test]
    fn default_mode_keeps_url() {
        assert_eq!(resolve_endpoint(COMPAT, ThinkMode::Default, true), COMPAT);
    }

    #[test]
    fn rewrite_disabled_keeps_url() {
        for mode in [ThinkMode::Default, ThinkMode::Enabled, ThinkMode::Disabled] {
            assert_eq!(resolve_endpoint(COMPAT, mode, false), COMPAT);
        }
    }

    #[test]
    fn native_url_untouched() {
        let url = "http://127.0.0.1:11434/api/chat";
        assert_eq!(resolve_endpoint(url, ThinkMode::Enabled, true), url);
    }

    #[test]
    fn keeps_host_port_and_query() {
        assert_eq!(
            resolve_endpoint(
                "https://10.0.0.5:11434/v1/chat/completions?x=1",
                ThinkMode::Enabled,
                true
            ),
            "https://10.0.0.5:11434/api/chat?x=1"
        );
    }
}
