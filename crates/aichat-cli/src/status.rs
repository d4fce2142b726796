//! `aichat status` — show configuration and the effective request setup.
//!
//! Everything is derived from the loaded config without sending a request:
//! the endpoint after think-mode resolution, the model's provider family and
//! the response envelope the parser will expect. The API key is only ever
//! reported as set or not set.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use aichat_core::config::{get_config_path, load_config, Config};
use aichat_providers::{family, resolve_endpoint, ResponseShape};

/// One `label: value` row of the status report.
#[derive(Debug, PartialEq, Eq)]
pub struct StatusRow {
    pub label: &'static str,
    pub value: String,
}

fn row(label: &'static str, value: impl Into<String>) -> StatusRow {
    StatusRow {
        label,
        value: value.into(),
    }
}

/// Status rows for a config.
pub fn collect(config: &Config) -> Vec<StatusRow> {
    let llm = &config.llm;
    let endpoint = resolve_endpoint(&llm.api_url, llm.think_mode, llm.fix_api_path_for_think_mode);
    let family = family::find_by_model(&llm.model)
        .map(|spec| format!("{} ({})", spec.family.as_str(), spec.display_name))
        .unwrap_or_else(|| family::classify(&llm.model).as_str().to_string());
    let shape = ResponseShape::for_local_provider(llm.use_local_provider);

    let mut endpoint_value = endpoint.clone();
    if endpoint != llm.api_url {
        endpoint_value.push_str(&format!(" (rewritten from {})", llm.api_url));
    }

    vec![
        row("Endpoint:", endpoint_value),
        row("Model:", llm.model.clone()),
        row("Family:", family),
        row(
            "Provider:",
            if llm.use_local_provider { "local" } else { "hosted" },
        ),
        row("Response shape:", shape.as_str()),
        row("Think mode:", llm.think_mode.to_string()),
        row("Timeout:", format!("{}s", llm.timeout_secs)),
        row(
            "API key:",
            if llm.has_api_key() { "set" } else { "not set" },
        ),
        row(
            "Persona:",
            if config.persona.system_prompt.trim().is_empty() {
                "built-in"
            } else {
                "custom"
            },
        ),
    ]
}

/// Run the status command.
pub fn run() -> Result<()> {
    let config_path = get_config_path();
    let config = load_config(None);

    println!();
    println!("{}", "💬 AIChat Status".cyan().bold());
    println!();
    print_config_line(&config_path);

    for StatusRow { label, value } in collect(&config) {
        println!("  {:<18} {}", label.bold(), value);
    }
    println!();

    Ok(())
}

fn print_config_line(config_path: &Path) {
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
