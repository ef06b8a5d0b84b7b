//! Persisted user settings.
//!
//! One JSON file holds the selected provider, one API key per provider,
//! the target language and the optional model and prompt overrides.
//! Switching provider keeps the other providers' keys.

use crate::error::TranslationError;
use crate::provider::Provider;
use crate::request::{TranslationSettings, DEFAULT_TARGET_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write settings file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Please enter a valid API key.")]
    EmptyApiKey,

    #[error("Failed to read API key: {0}")]
    Prompt(#[source] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSettings {
    #[serde(default = "default_provider")]
    pub provider: Provider,
    #[serde(default = "default_language")]
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

fn default_provider() -> Provider {
    Provider::Gemini
}

fn default_language() -> String {
    DEFAULT_TARGET_LANGUAGE.to_string()
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            target_language: default_language(),
            gemini_api_key: None,
            openai_api_key: None,
            openrouter_api_key: None,
            model: None,
            prompt_template: None,
        }
    }
}

impl StoredSettings {
    fn key_slot(&mut self, provider: Provider) -> &mut Option<String> {
        match provider {
            Provider::Gemini => &mut self.gemini_api_key,
            Provider::OpenAi => &mut self.openai_api_key,
            Provider::OpenRouter => &mut self.openrouter_api_key,
        }
    }

    /// Stored key for `provider`, ignoring blank values.
    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::Gemini => &self.gemini_api_key,
            Provider::OpenAi => &self.openai_api_key,
            Provider::OpenRouter => &self.openrouter_api_key,
        };
        key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn set_api_key(&mut self, provider: Provider, key: &str) -> Result<(), SettingsError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SettingsError::EmptyApiKey);
        }
        *self.key_slot(provider) = Some(key.to_string());
        Ok(())
    }

    pub fn delete_api_key(&mut self, provider: Provider) {
        *self.key_slot(provider) = None;
    }

    /// Settings for the selected provider, ready to hand to the core.
    pub fn resolve(&self) -> Result<TranslationSettings, TranslationError> {
        let api_key = self.api_key(self.provider).ok_or_else(|| {
            TranslationError::configuration(format!("{} API key is required.", self.provider))
        })?;

        let language = self.target_language.trim();
        Ok(TranslationSettings {
            provider: self.provider,
            api_key: api_key.to_string(),
            target_language: if language.is_empty() {
                default_language()
            } else {
                language.to_string()
            },
            model: non_blank(self.model.as_deref()),
            prompt_template: non_blank(self.prompt_template.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// JSON file holding [`StoredSettings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load(&self) -> Result<StoredSettings, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", self.path.display());
                return Ok(StoredSettings::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write settings through a temporary file and rename it into place.
    pub fn save(&self, settings: &StoredSettings) -> Result<(), SettingsError> {
        let write_err = |source: io::Error| SettingsError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Load, apply `change`, save.
    pub fn update<F>(&self, change: F) -> Result<StoredSettings, SettingsError>
    where
        F: FnOnce(&mut StoredSettings) -> Result<(), SettingsError>,
    {
        let mut settings = self.load()?;
        change(&mut settings)?;
        self.save(&settings)?;
        Ok(settings)
    }

    pub fn set_provider(&self, provider: Provider) -> Result<StoredSettings, SettingsError> {
        self.update(|s| {
            s.provider = provider;
            Ok(())
        })
    }

    pub fn set_api_key(&self, provider: Provider, key: &str) -> Result<StoredSettings, SettingsError> {
        self.update(|s| s.set_api_key(provider, key))
    }

    pub fn delete_api_key(&self, provider: Provider) -> Result<StoredSettings, SettingsError> {
        self.update(|s| {
            s.delete_api_key(provider);
            Ok(())
        })
    }

    pub fn set_target_language(&self, language: &str) -> Result<StoredSettings, SettingsError> {
        self.update(|s| {
            s.target_language = language.trim().to_string();
            Ok(())
        })
    }

    pub fn set_model(&self, model: Option<&str>) -> Result<StoredSettings, SettingsError> {
        self.update(|s| {
            s.model = non_blank(model);
            Ok(())
        })
    }

    pub fn set_prompt_template(&self, template: Option<&str>) -> Result<StoredSettings, SettingsError> {
        self.update(|s| {
            s.prompt_template = non_blank(template);
            Ok(())
        })
    }
}

/// Ask for `provider`'s API key on `output` and save a non-blank answer.
///
/// Returns the saved settings, or `None` when nothing was entered.
pub fn prompt_for_api_key<R, W>(
    store: &SettingsStore,
    provider: Provider,
    input: &mut R,
    output: &mut W,
) -> Result<Option<StoredSettings>, SettingsError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "Enter {} API key (stored locally): ", provider)
        .map_err(SettingsError::Prompt)?;
    output.flush().map_err(SettingsError::Prompt)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(SettingsError::Prompt)?;
    if answer.trim().is_empty() {
        return Ok(None);
    }
    store.set_api_key(provider, &answer).map(Some)
}
