//! Provider families — how the message list is shaped for a given model.
//!
//! Most chat endpoints accept a `system` role. Some model families don't, and
//! the persona has to be folded into the single user message instead.
//! `FAMILIES` lists the exceptions; any model not matched there uses the
//! system-role layout.
//!
//! Adding a family means one `ProviderFamily` variant, one `FAMILIES` entry
//! and one arm in [`ProviderFamily::compose`].

use aichat_core::types::Message;

/// Section header for the persona when it's folded into the user message.
pub const SYSTEM_INSTRUCTION_HEADER: &str = "[System Instruction]";
/// Section header for the turn's input when the persona is folded in.
pub const USER_MESSAGE_HEADER: &str = "[User Message]";

// ─────────────────────────────────────────────
// ProviderFamily
// ─────────────────────────────────────────────

/// Message-list layout accepted by a model family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderFamily {
    /// `[system, user]`.
    SystemRole,
    /// A single `user` message carrying persona and input under section headers.
    FoldIn,
}

impl ProviderFamily {
    /// Build the message list for one turn.
    pub fn compose(self, system_prompt: &str, user_prompt: &str) -> Vec<Message> {
        match self {
            ProviderFamily::SystemRole => vec![
                Message::system(system_prompt),
                Message::user(user_prompt),
            ],
            ProviderFamily::FoldIn => vec![Message::user(format!(
                "{SYSTEM_INSTRUCTION_HEADER}\n{system_prompt}\n\n{USER_MESSAGE_HEADER}\n{user_prompt}"
            ))],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderFamily::SystemRole => "system-role",
            ProviderFamily::FoldIn => "fold-in",
        }
    }
}

// ─────────────────────────────────────────────
// FamilySpec — static metadata for one family
// ─────────────────────────────────────────────

/// Static description of a model family that needs a non-default layout.
#[derive(Clone, Debug)]
pub struct FamilySpec {
    /// Internal name (e.g. `"gemma"`).
    pub name: &'static str,
    /// Substrings matched against the model name, case-sensitively.
    pub keywords: &'static [&'static str],
    /// Layout used by this family.
    pub family: ProviderFamily,
    /// Human-readable name for logs and `aichat status`.
    pub display_name: &'static str,
}

/// Known families with a non-default layout, in matching priority order.
pub static FAMILIES: &[FamilySpec] = &[
    // Gemma chat templates have no system role.
    FamilySpec {
        name: "gemma",
        keywords: &["gemma"],
        family: ProviderFamily::FoldIn,
        display_name: "Gemma",
    },
];

// ─────────────────────────────────────────────
// Matching functions
// ─────────────────────────────────────────────

/// Find the family spec whose keywords appear in `model`.
pub fn find_by_model(model: &str) -> Option<&'static FamilySpec> {
    FAMILIES
        .iter()
        .find(|spec| spec.keywords.iter().any(|kw| model.contains(kw)))
}

/// Classify a model name. Unmatched models use the system-role layout.
pub fn classify(model: &str) -> ProviderFamily {
    find_by_model(model).map_or(ProviderFamily::SystemRole, |spec| spec.family)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
