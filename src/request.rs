use crate::error::TranslationError;
use crate::provider::Provider;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Fully-resolved settings handed to the core for each call.
///
/// Built by the caller from whatever storage it uses; the core never reads
/// environment variables or settings files on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationSettings {
    pub provider: Provider,
    pub api_key: String,
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

impl TranslationSettings {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            model: None,
            prompt_template: None,
        }
    }

    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }
}

/// One translation call's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub provider: Provider,
    pub api_key: String,
    pub target_language: String,
    pub model: Option<String>,
    pub prompt_template: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, settings: &TranslationSettings) -> Self {
        Self {
            text: text.into(),
            provider: settings.provider,
            api_key: settings.api_key.clone(),
            target_language: settings.target_language.clone(),
            model: settings.model.clone(),
            prompt_template: settings.prompt_template.clone(),
        }
    }

    /// Reject requests that must never reach the network.
    pub fn validate(&self) -> Result<(), TranslationError> {
        if self.api_key.trim().is_empty() {
            return Err(TranslationError::configuration(format!(
                "{} API key is required.",
                self.provider
            )));
        }
        if self.text.trim().is_empty() {
            return Err(TranslationError::configuration("Nothing to translate."));
        }
        Ok(())
    }

    /// Target language, falling back to English when blank.
    pub fn language(&self) -> &str {
        let language = self.target_language.trim();
        if language.is_empty() {
            DEFAULT_TARGET_LANGUAGE
        } else {
            language
        }
    }

    /// Requested model, falling back to the provider default when absent or blank.
    pub fn model(&self) -> &str {
        match self.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => model,
            _ => self.provider.default_model(),
        }
    }
}
