//! Direct translation against the selected provider.
//!
//! Each [`Provider`] variant owns a request builder and a response parser;
//! [`ProviderRouter`] picks the pair by exhaustive match, issues exactly one
//! HTTP call and normalizes the outcome.

use crate::error::{TranslationError, TranslationResult};
use crate::provider::{Endpoints, Provider};
use crate::prompt::resolve_prompt;
use crate::request::TranslationRequest;
use crate::{gemini, openai};
use std::sync::Arc;
use tracing::{debug, info};

/// A fully-built HTTP call, before it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: reqwest::Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
}

/// Builds and sends provider requests.
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    client: reqwest::Client,
    endpoints: Arc<Endpoints>,
}

impl Default for ProviderRouter {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), Endpoints::default())
    }
}

impl ProviderRouter {
    pub fn new(client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self {
            client,
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Build the outbound call for `request` without sending it.
    pub fn build(&self, request: &TranslationRequest) -> Result<OutboundRequest, TranslationError> {
        let prompt = resolve_prompt(request.prompt_template.as_deref(), request.language());
        match request.provider {
            Provider::Gemini => gemini::build_request(&self.endpoints, request, &prompt),
            Provider::OpenAi | Provider::OpenRouter => {
                openai::build_request(&self.endpoints, request, &prompt)
            }
        }
    }

    /// Translate `request` with a single call to its provider.
    ///
    /// Returns the translated text trimmed of surrounding whitespace. An
    /// empty string after trimming is returned as-is.
    pub async fn translate(&self, request: &TranslationRequest) -> TranslationResult {
        request.validate()?;
        let outbound = self.build(request)?;
        let provider = request.provider;

        info!(
            "Translating {} chars to '{}' via {} ({})",
            request.text.chars().count(),
            request.language(),
            provider.display_name(),
            request.model()
        );

        let body = self.send(provider, outbound).await?;
        let text = match provider {
            Provider::Gemini => gemini::parse_response(&body)?,
            Provider::OpenAi | Provider::OpenRouter => openai::parse_response(provider, &body)?,
        };

        debug!(
            "{} returned {} chars",
            provider.display_name(),
            text.chars().count()
        );
        Ok(text.trim().to_string())
    }

    /// Send the call; any non-success status becomes a transport error.
    ///
    /// Network errors are stored without their URL, which carries the
    /// Gemini key.
    async fn send(
        &self,
        provider: Provider,
        outbound: OutboundRequest,
    ) -> Result<String, TranslationError> {
        let mut builder = self.client.post(outbound.url);
        for (name, value) in &outbound.headers {
            builder = builder.header(*name, value);
        }
        let builder = builder.json(&outbound.body);

        let response = builder
            .send()
            .await
            .map_err(|source| TranslationError::Network {
                provider: provider.display_name(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Transport {
                provider: provider.display_name(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|source| TranslationError::Network {
                provider: provider.display_name(),
                source: source.without_url(),
            })
    }
}
