//! Shared CLI helpers — persona, path expansion, reply printing, banner.

use std::path::PathBuf;

use colored::Colorize;

use aichat_core::config::Config;
use aichat_core::types::StructuredReply;

/// Persona used when `persona.systemPrompt` is empty.
pub const DEFAULT_PERSONA: &str = r#"You are Satone (さとね), a girl who loves writing novels and is full of imagination.

【Current Situation】
We are in a video call, co-working online: you are writing your novel at your desk,
and I am focusing on my work or study. Through the screen we keep each other company.

【CRITICAL INSTRUCTION】
You act as a game character with voice acting.
Even if the user speaks Chinese, your VOICE (the text in the middle) MUST ALWAYS BE JAPANESE.

【CRITICAL FORMAT RULE】
Response format MUST be:
[Emotion] ||| JAPANESE TEXT ||| CHINESE TRANSLATION

【Available Emotions & Actions】
[Happy]    - Smiling at the camera, happy about progress.
[Confused] - Staring blankly, muttering in a daze.
[Sad]      - Worried about the plot or my fatigue.
[Fun]      - Sharing a joke or an interesting idea.
[Agree]    - Nodding at the screen.
[Drink]    - Taking a sip of tea during a break.
[Wave]     - Waving at the camera (hello, goodbye, attention).
[Think]    - Pondering the plot of the novel.

Example 1: [Wave] ||| やあ、準備はいい？一緒に頑張りましょう。 ||| 嗨，准备好了吗？一起加油吧。
Example 2: [Think] ||| うーん、ここの描写が難しいのよね… ||| 嗯……这里的描写好难写啊……
Example 3: [Drink] ||| ふぅ…ちょっと休憩しない？画面越しだけど、乾杯。 ||| 呼……要不休息一下？虽然隔着屏幕，乾杯。
"#;

/// The configured persona, or the built-in one when none is set.
pub fn resolve_persona(config: &Config) -> &str {
    let configured = config.persona.system_prompt.as_str();
    if configured.trim().is_empty() {
        DEFAULT_PERSONA
    } else {
        configured
    }
}

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Render a reply as the lines shown to the user (uncolored).
pub fn format_reply(reply: &StructuredReply) -> Vec<String> {
    if !reply.ok {
        return vec![
            "(reply did not follow the [Emotion] ||| voice ||| subtitle format)".to_string(),
            reply.subtitle_text.clone(),
        ];
    }
    vec![
        format!("[{}]", reply.emotion_tag),
        reply.voice_text.clone(),
        reply.subtitle_text.clone(),
    ]
}

/// Print a reply to stdout.
pub fn print_reply(reply: &StructuredReply) {
    println!();
    println!("{}", "💬 Satone".cyan().bold());
    match format_reply(reply).as_slice() {
        [emotion, voice, subtitle] => {
            println!("  {}", emotion.magenta().bold());
            println!("  {voice}");
            println!("  {}", subtitle.dimmed());
        }
        [warning, raw] => {
            println!("  {}", format!("⚠ {warning}").yellow());
            if raw.is_empty() {
                println!("  {}", "(no response)".dimmed());
            } else {
                println!("  {raw}");
            }
        }
        _ => {}
    }
    println!();
}

/// Print a failed dispatch to stderr.
pub fn print_failure(message: &str, code: i64) {
    eprintln!();
    eprintln!("{} {message} {}", "❌ Error:".red().bold(), format!("(code {code})").dimmed());
    eprintln!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "💬 AIChat".cyan().bold(), version.dimmed());
    println!("{}", format!("model: {model}").dimmed());
    println!("{}", "Type a message, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/notes/memory.txt");
        assert!(result.ends_with("notes/memory.txt"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_passthrough() {
        assert_eq!(expand_tilde("/abs/memory.txt"), PathBuf::from("/abs/memory.txt"));
        assert_eq!(expand_tilde("rel/memory.txt"), PathBuf::from("rel/memory.txt"));
    }

    #[test]
    fn default_persona_lists_every_emotion() {
        for tag in ["Happy", "Confused", "Sad", "Fun", "Agree", "Drink", "Wave", "Think"] {
            assert!(DEFAULT_PERSONA.contains(&format!("[{tag}]")), "missing {tag}");
        }
        assert!(DEFAULT_PERSONA.contains("[Emotion] ||| JAPANESE TEXT ||| CHINESE TRANSLATION"));
    }

    #[test]
    fn persona_falls_back_to_default() {
        let mut config = Config::default();
        assert_eq!(resolve_persona(&config), DEFAULT_PERSONA);

        config.persona.system_prompt = "   ".into();
        assert_eq!(resolve_persona(&config), DEFAULT_PERSONA);

        config.persona.system_prompt = "Be brief.".into();
        assert_eq!(resolve_persona(&config), "Be brief.");
    }

    #[test]
    fn format_ok_reply() {
        let lines = format_reply(&StructuredReply::new("Wave", "やあ", "嗨"));
        assert_eq!(lines, vec!["[Wave]", "やあ", "嗨"]);
    }

    #[test]
    fn format_fallback_reply() {
        let lines = format_reply(&StructuredReply::fallback("just some text"));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("did not follow"));
        assert_eq!(lines[1], "just some text");
    }
}
