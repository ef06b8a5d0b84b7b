//! Translate highlight text through a large-language-model provider.
//!
//! - `router`: builds and sends one request to Gemini, OpenAI or OpenRouter
//! - `bridge`: tries a relay first and falls back to the router
//! - `relay`: relay wire format, channels and the relay server
//! - `settings`: persisted provider, keys, language, model and prompt
//!
//! ```rust,ignore
//! use highlight_translator::{Provider, ProviderRouter, RelayBridge, TranslationSettings};
//!
//! let settings = TranslationSettings::new(Provider::OpenAi, "sk-...").with_target_language("fr");
//! let bridge = RelayBridge::direct(ProviderRouter::default());
//! let text = bridge.translate("Hello", &settings).await?;
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod relay;
pub mod request;
pub mod router;
pub mod security;
pub mod settings;

pub use bridge::{with_fallback, RelayBridge};
pub use error::{TranslationError, TranslationResult};
pub use provider::{Endpoints, Provider};
pub use request::{TranslationRequest, TranslationSettings};
pub use router::ProviderRouter;

/// Label of the translate control for a target language, e.g. "Translate (FR)".
pub fn translate_label(language: &str) -> String {
    let language = language.trim();
    let language = if language.is_empty() { "en" } else { language };
    format!("Translate ({})", language.to_uppercase())
}
