//! Instruction prompt sent ahead of the source text.

use regex::Regex;
use std::sync::OnceLock;

/// Built-in instruction used when no template is configured.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Translate the following text to {language}. \
Preserve meaning, tone, and basic formatting. \
Only return the translated {language} text without comments.";

/// Placeholder matcher, initialized on first use.
static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"(?i)\{language\}").expect("placeholder pattern is a valid regex")
    })
}

/// Whether `template` contains the `{language}` placeholder (any case).
pub fn has_placeholder(template: &str) -> bool {
    placeholder().is_match(template)
}

/// Substitute `language` for every `{language}` placeholder.
///
/// A blank or absent template falls back to [`DEFAULT_PROMPT_TEMPLATE`].
/// Text without a placeholder is returned unchanged, so resolving an
/// already-resolved prompt is a no-op.
pub fn resolve_prompt(template: Option<&str>, language: &str) -> String {
    let template = match template {
        Some(t) if !t.trim().is_empty() => t,
        _ => DEFAULT_PROMPT_TEMPLATE,
    };

    // NoExpand keeps `$` in language names literal.
    placeholder()
        .replace_all(template, regex::NoExpand(language))
        .into_owned()
}
