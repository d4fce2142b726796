//! Response parsing.
//!
//! Two stages:
//! 1. [`extract_content`] pulls the assistant text out of the provider's
//!    JSON envelope.
//! 2. [`decode_reply`] splits that text into the
//!    `[Emotion] ||| voice ||| subtitle` triple.
//!
//! Neither stage fails. An envelope without assistant text yields `""`, and
//! text that doesn't follow the format yields a fallback reply carrying the
//! raw text as its subtitle.

use serde_json::Value;

use aichat_core::diagnostics::DiagnosticSink;
use aichat_core::types::StructuredReply;

/// Delimiter the persona asks the model to use.
pub const PRIMARY_DELIMITER: &str = "|||";
/// Delimiter some models emit instead.
pub const FALLBACK_DELIMITER: &str = "|";

// ─────────────────────────────────────────────
// Envelope extraction
// ─────────────────────────────────────────────

/// Envelope layout of a chat response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseShape {
    /// Ollama native: `{"message": {"content": ...}}`.
    Native,
    /// OpenAI-compatible: `{"choices": [{"message": {"content": ...}}]}`.
    OpenAiCompatible,
}

impl ResponseShape {
    /// Local providers answer in the native envelope.
    pub fn for_local_provider(use_local_provider: bool) -> Self {
        if use_local_provider {
            ResponseShape::Native
        } else {
            ResponseShape::OpenAiCompatible
        }
    }

    /// JSON pointer to the assistant text.
    fn content_pointer(self) -> &'static str {
        match self {
            ResponseShape::Native => "/message/content",
            ResponseShape::OpenAiCompatible => "/choices/0/message/content",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseShape::Native => "native",
            ResponseShape::OpenAiCompatible => "openai-compatible",
        }
    }
}

/// Assistant text from a raw response body, or `""` if it isn't there.
pub fn extract_content(raw_body: &str, shape: ResponseShape) -> String {
    let Ok(envelope) = serde_json::from_str::<Value>(raw_body) else {
        return String::new();
    };

    envelope
        .pointer(shape.content_pointer())
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

// ─────────────────────────────────────────────
// Structured decode
// ─────────────────────────────────────────────

/// Split assistant text into emotion, voice and subtitle.
///
/// The long delimiter is tried first; if it yields fewer than three
/// segments the text is re-split on the short one. Segments past the third
/// are ignored.
pub fn decode_reply(text: &str, sink: &dyn DiagnosticSink) -> StructuredReply {
    let mut parts: Vec<&str> = text.split(PRIMARY_DELIMITER).collect();
    if parts.len() < 3 {
        parts = text.split(FALLBACK_DELIMITER).collect();
    }

    if parts.len() >= 3 {
        let emotion = parts[0].trim().replace(['[', ']'], "");
        return StructuredReply::new(emotion.trim(), parts[1].trim(), parts[2].trim());
    }

    sink.warning(&format!(
        "[Format error] AI reply does not match the expected format: {text}"
    ));
    StructuredReply::fallback(text)
}

/// Extract and decode in one step.
pub fn parse_response(raw_body: &str, shape: ResponseShape, sink: &dyn DiagnosticSink) -> StructuredReply {
    let content = extract_content(raw_body, shape);
    decode_reply(&content, sink)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use aichat_core::diagnostics::{Level, NoopSink, RecordingSink};
    use aichat_core::types::FALLBACK_EMOTION;
    use serde_json::json;

    // ── extract_content ──

    #[test]
    fn test_extract_native() {
        let body = json!({
            "model": "llama3",
            "message": { "role": "assistant", "content": "[Wave] ||| やあ ||| 嗨" },
            "done": true
        })
        .to_string();
        assert_eq!(extract_content(&body, ResponseShape::Native), "[Wave] ||| やあ ||| 嗨");
    }

    #[test]
    fn test_extract_openai_compatible() {
        let body = json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "first" } },
                { "index": 1, "message": { "role": "assistant", "content": "second" } }
            ]
        })
        .to_string();
        assert_eq!(extract_content(&body, ResponseShape::OpenAiCompatible), "first");
    }

    #[test]
    fn test_extract_preserves_text_verbatim() {
        let body = json!({ "message": { "content": "  padded \n" } }).to_string();
        assert_eq!(extract_content(&body, ResponseShape::Native), "  padded \n");
    }

    #[test]
    fn test_extract_missing_fields() {
        assert_eq!(extract_content("{}", ResponseShape::Native), "");
        assert_eq!(extract_content("{}", ResponseShape::OpenAiCompatible), "");
        assert_eq!(
            extract_content(r#"{"choices":[]}"#, ResponseShape::OpenAiCompatible),
            ""
        );
        assert_eq!(
            extract_content(r#"{"message":{"content":null}}"#, ResponseShape::Native),
            ""
        );
    }

    #[test]
    fn test_extract_wrong_shape() {
        let native = r#"{"message":{"content":"hi"}}"#;
        assert_eq!(extract_content(native, ResponseShape::OpenAiCompatible), "");
    }

    #[test]
    fn test_extract_not_json() {
        assert_eq!(extract_content("<html>502</html>", ResponseShape::Native), "");
        assert_eq!(extract_content("", ResponseShape::OpenAiCompatible), "");
    }

    #[test]
    fn test_shape_for_local_provider() {
        assert_eq!(ResponseShape::for_local_provider(true), ResponseShape::Native);
        assert_eq!(
            ResponseShape::for_local_provider(false),
            ResponseShape::OpenAiCompatible
        );
    }

    // ── decode_reply ──

    #[test]
    fn test_decode_well_formed() {
        let reply = decode_reply("[Happy] ||| hello ||| 你好", &NoopSink);
        assert_eq!(reply, StructuredReply::new("Happy", "hello", "你好"));
        assert!(reply.ok);
    }

    #[test]
    fn test_decode_short_delimiter() {
        let reply = decode_reply("[Sad] | crying | 哭泣", &NoopSink);
        assert!(reply.ok);
        assert_eq!(reply.emotion_tag, "Sad");
        assert_eq!(reply.voice_text, "crying");
        assert_eq!(reply.subtitle_text, "哭泣");
    }

    #[test]
    fn test_decode_malformed() {
        let sink = RecordingSink::new();
        let reply = decode_reply("just some text", sink.as_ref());

        assert!(!reply.ok);
        assert_eq!(reply.emotion_tag, FALLBACK_EMOTION);
        assert_eq!(reply.voice_text, "");
        assert_eq!(reply.subtitle_text, "just some text");

        let warnings = sink.at(Level::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("just some text"));
    }

    #[test]
    fn test_decode_empty_text() {
        let reply = decode_reply("", &NoopSink);
        assert!(!reply.ok);
        assert_eq!(reply.subtitle_text, "");
    }

    #[test]
    fn test_decode_extra_segments_ignored() {
        let reply = decode_reply("[Fun] ||| a ||| b ||| c", &NoopSink);
        assert!(reply.ok);
        assert_eq!(reply.subtitle_text, "b");
    }

    #[test]
    fn test_decode_two_long_segments_falls_back_to_short_split() {
        // "a ||| b" splits into 2 on "|||", so it's re-split on "|": ["a ", "", "", " b"].
        let reply = decode_reply("a ||| b", &NoopSink);
        assert!(reply.ok);
        assert_eq!(reply.emotion_tag, "a");
        assert_eq!(reply.voice_text, "");
        assert_eq!(reply.subtitle_text, "");
    }

    #[test]
    fn test_decode_long_delimiter_tried_first() {
        // Short delimiter inside a segment survives when the long split succeeds.
        let reply = decode_reply("[Think] ||| a|b ||| c", &NoopSink);
        assert_eq!(reply.voice_text, "a|b");
        assert_eq!(reply.subtitle_text, "c");
    }

    #[test]
    fn test_decode_strips_brackets_and_whitespace() {
        let reply = decode_reply("  [ Drink ]  |||  ふぅ…  |||  呼……  ", &NoopSink);
        assert_eq!(reply.emotion_tag, "Drink");
        assert_eq!(reply.voice_text, "ふぅ…");
        assert_eq!(reply.subtitle_text, "呼……");
    }

    #[test]
    fn test_decode_multiline_segments() {
        let reply = decode_reply("[Agree]\n|||\nうん。\n|||\n嗯。\n", &NoopSink);
        assert_eq!(reply, StructuredReply::new("Agree", "うん。", "嗯。"));
    }

    #[test]
    fn test_decode_no_warning_on_success() {
        let sink = RecordingSink::new();
        decode_reply("[Happy] ||| a ||| b", sink.as_ref());
        assert!(sink.at(Level::Warning).is_empty());
    }

    // ── parse_response ──

    #[test]
    fn test_parse_native_scenario() {
        let body = r#"{"message":{"content":"[Wave] ||| やあ ||| 嗨"}}"#;
        let reply = parse_response(body, ResponseShape::Native, &NoopSink);
        assert_eq!(reply, StructuredReply::new("Wave", "やあ", "嗨"));
    }

    #[test]
    fn test_parse_missing_content_is_fallback() {
        let reply = parse_response("{}", ResponseShape::OpenAiCompatible, &NoopSink);
        assert!(!reply.ok);
        assert_eq!(reply.subtitle_text, "");
    }
}
