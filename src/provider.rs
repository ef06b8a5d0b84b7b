//! Supported translation backends and where to reach them.

use crate::error::TranslationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_OPENROUTER_TITLE: &str = "FF Readwise Translator";
pub const DEFAULT_OPENROUTER_REFERER: &str = "https://readwise.io";

/// A translation backend.
///
/// The set is closed: anything else is rejected when parsed, before a
/// request can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Gemini, Provider::OpenAi, Provider::OpenRouter];

    /// Identifier used in settings and relay messages (e.g. "openai").
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::OpenRouter => "openrouter",
        }
    }

    /// Name used in user-facing messages (e.g. "OpenAI").
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::OpenRouter => "OpenRouter",
        }
    }

    /// Model used when the caller does not pick one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-1.5-flash",
            Provider::OpenAi => "gpt-4o-mini",
            Provider::OpenRouter => "openai/gpt-4o-mini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "openrouter" => Ok(Provider::OpenRouter),
            other => Err(TranslationError::configuration(format!(
                "Unsupported provider: {}",
                other
            ))),
        }
    }
}

/// Base URLs and attribution values for the backends.
///
/// Production uses [`Endpoints::default`]; tests point these at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Gemini API root; the model path is appended per request.
    pub gemini_api_url: String,
    /// Full OpenAI chat-completions URL.
    pub openai_api_url: String,
    /// Full OpenRouter chat-completions URL.
    pub openrouter_api_url: String,
    /// Sent as `X-Title` to OpenRouter.
    pub openrouter_title: String,
    /// Sent as `HTTP-Referer` to OpenRouter.
    pub openrouter_referer: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            openrouter_api_url: DEFAULT_OPENROUTER_API_URL.to_string(),
            openrouter_title: DEFAULT_OPENROUTER_TITLE.to_string(),
            openrouter_referer: DEFAULT_OPENROUTER_REFERER.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every backend at the same mock server root.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            gemini_api_url: format!("{}/v1beta", base),
            openai_api_url: format!("{}/v1/chat/completions", base),
            openrouter_api_url: format!("{}/api/v1/chat/completions", base),
            ..Self::default()
        }
    }
}
