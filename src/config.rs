use crate::provider::{
    Endpoints, Provider, DEFAULT_GEMINI_API_URL, DEFAULT_OPENAI_API_URL,
    DEFAULT_OPENROUTER_API_URL, DEFAULT_OPENROUTER_REFERER, DEFAULT_OPENROUTER_TITLE,
};
use crate::settings::{SettingsStore, StoredSettings};
use anyhow::{Context, Result};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    // Settings
    pub settings_file: String,

    // Relay
    pub relay_url: Option<String>,
    pub relay_secret: Option<String>,
    pub relay_host: String,
    pub relay_port: u16,

    // Provider endpoints
    pub gemini_api_url: String,
    pub openai_api_url: String,
    pub openrouter_api_url: String,
    pub openrouter_title: String,
    pub openrouter_referer: String,

    // Overrides of persisted settings
    pub provider: Option<Provider>,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub target_language: Option<String>,
    pub model: Option<String>,
    pub prompt_template: Option<String>,
}

/// Read an optional variable, treating blank values as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Settings
            settings_file: std::env::var("SETTINGS_FILE")
                .unwrap_or_else(|_| "translator-settings.json".to_string()),

            // Relay
            relay_url: optional_var("RELAY_URL"),
            relay_secret: optional_var("RELAY_SECRET"),
            relay_host: std::env::var("RELAY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            relay_port: match std::env::var("RELAY_PORT") {
                Ok(port) => port
                    .parse()
                    .with_context(|| format!("RELAY_PORT is not a valid port: {}", port))?,
                Err(_) => 8787,
            },

            // Provider endpoints
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
            openrouter_api_url: std::env::var("OPENROUTER_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_API_URL.to_string()),
            openrouter_title: std::env::var("OPENROUTER_TITLE")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_TITLE.to_string()),
            openrouter_referer: std::env::var("OPENROUTER_REFERER")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_REFERER.to_string()),

            // Overrides
            provider: optional_var("TRANSLATOR_PROVIDER")
                .map(|p| p.parse::<Provider>())
                .transpose()
                .context("TRANSLATOR_PROVIDER is invalid")?,
            gemini_api_key: optional_var("GEMINI_API_KEY"),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openrouter_api_key: optional_var("OPENROUTER_API_KEY"),
            target_language: optional_var("TARGET_LANGUAGE"),
            model: optional_var("TRANSLATOR_MODEL"),
            prompt_template: optional_var("PROMPT_TEMPLATE"),
        })
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            gemini_api_url: self.gemini_api_url.clone(),
            openai_api_url: self.openai_api_url.clone(),
            openrouter_api_url: self.openrouter_api_url.clone(),
            openrouter_title: self.openrouter_title.clone(),
            openrouter_referer: self.openrouter_referer.clone(),
        }
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(&self.settings_file)
    }

    /// Layer environment overrides on top of persisted settings.
    pub fn apply_overrides(&self, mut settings: StoredSettings) -> StoredSettings {
        if let Some(provider) = self.provider {
            settings.provider = provider;
        }
        let keys = [
            (Provider::Gemini, &self.gemini_api_key),
            (Provider::OpenAi, &self.openai_api_key),
            (Provider::OpenRouter, &self.openrouter_api_key),
        ];
        for (provider, key) in keys {
            if let Some(key) = key {
                if let Err(e) = settings.set_api_key(provider, key) {
                    warn!("Ignoring {} API key override: {}", provider, e);
                }
            }
        }
        if let Some(language) = &self.target_language {
            settings.target_language = language.clone();
        }
        if let Some(model) = &self.model {
            settings.model = Some(model.clone());
        }
        if let Some(template) = &self.prompt_template {
            settings.prompt_template = Some(template.clone());
        }
        settings
    }
}
