//! Relay wire messages.
//!
//! Request: `{type:"translate-request", text, provider, apiKey, targetLanguage, model?, promptTemplate?}`
//! Response: `{ok:true, text}` or `{ok:false, error}`.

use crate::error::{TranslationError, TranslationResult};
use crate::request::TranslationRequest;
use serde::{Deserialize, Serialize};

/// Message type of a translation request.
pub const TRANSLATE_REQUEST: &str = "translate-request";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

impl RelayRequest {
    pub fn is_translate(&self) -> bool {
        self.kind == TRANSLATE_REQUEST
    }

    /// Parse the message back into a request.
    ///
    /// The provider arrives as a free string, so an unknown value is
    /// rejected here as a configuration error.
    pub fn into_translation_request(self) -> Result<TranslationRequest, TranslationError> {
        Ok(TranslationRequest {
            provider: self.provider.parse()?,
            text: self.text,
            api_key: self.api_key,
            target_language: self.target_language,
            model: self.model,
            prompt_template: self.prompt_template,
        })
    }
}

impl From<&TranslationRequest> for RelayRequest {
    fn from(request: &TranslationRequest) -> Self {
        Self {
            kind: TRANSLATE_REQUEST.to_string(),
            text: request.text.clone(),
            provider: request.provider.id().to_string(),
            api_key: request.api_key.clone(),
            target_language: request.target_language.clone(),
            model: request.model.clone(),
            prompt_template: request.prompt_template.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: None,
            error: Some(error.into()),
        }
    }

    /// Interpret the reply.
    ///
    /// `None` means the reply is unusable (`ok:true` without text) and the
    /// caller should fall back. An `ok:false` reply is always an answer.
    pub fn into_outcome(self) -> Option<TranslationResult> {
        if self.ok {
            return self.text.map(Ok);
        }
        let error = self
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Relay reported a failure without details.".to_string());
        Some(Err(TranslationError::Relay(error)))
    }
}

impl From<TranslationResult> for RelayResponse {
    fn from(result: TranslationResult) -> Self {
        match result {
            Ok(text) => Self::success(text),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::request::TranslationSettings;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let settings = TranslationSettings::new(Provider::OpenRouter, "or-key")
            .with_target_language("es")
            .with_model("anthropic/claude-3-haiku");
        let message = RelayRequest::from(&TranslationRequest::new("Hello", &settings));

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "translate-request",
                "text": "Hello",
                "provider": "openrouter",
                "apiKey": "or-key",
                "targetLanguage": "es",
                "model": "anthropic/claude-3-haiku"
            })
        );
    }

    #[test]
    fn test_request_parses_back_to_identical_fields() {
        let settings = TranslationSettings::new(Provider::Gemini, "g")
            .with_target_language("ja")
            .with_prompt_template("To {language}");
        let original = TranslationRequest::new("Hello", &settings);
        let parsed = RelayRequest::from(&original)
            .into_translation_request()
            .unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_unknown_provider_rejected_on_parse() {
        let message: RelayRequest = serde_json::from_value(json!({
            "type": "translate-request",
            "text": "Hello",
            "provider": "deepl",
            "apiKey": "k"
        }))
        .unwrap();
        let err = message.into_translation_request().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported provider: deepl");
    }

    #[test]
    fn test_is_translate() {
        let mut message: RelayRequest =
            serde_json::from_value(json!({"type": "translate-request"})).unwrap();
        assert!(message.is_translate());
        message.kind = "ping".to_string();
        assert!(!message.is_translate());
    }

    #[test]
    fn test_response_wire_shapes() {
        assert_eq!(
            serde_json::to_value(RelayResponse::success("Bonjour")).unwrap(),
            json!({"ok": true, "text": "Bonjour"})
        );
        assert_eq!(
            serde_json::to_value(RelayResponse::failure("boom")).unwrap(),
            json!({"ok": false, "error": "boom"})
        );
    }

    #[test]
    fn test_success_outcome() {
        let outcome = RelayResponse::success("Bonjour").into_outcome();
        assert_eq!(outcome.unwrap().unwrap(), "Bonjour");
    }

    #[test]
    fn test_failure_outcome_keeps_message() {
        let outcome = RelayResponse::failure("Gemini API error: 403 denied").into_outcome();
        let err = outcome.unwrap().unwrap_err();
        assert!(matches!(err, TranslationError::Relay(_)));
        assert_eq!(err.to_string(), "Gemini API error: 403 denied");
    }

    #[test]
    fn test_ok_without_text_is_unusable() {
        let response: RelayResponse = serde_json::from_value(json!({"ok": true})).unwrap();
        assert!(response.into_outcome().is_none());
    }

    #[test]
    fn test_failure_without_error_is_still_an_answer() {
        let response: RelayResponse = serde_json::from_value(json!({"ok": false})).unwrap();
        let err = response.into_outcome().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Relay reported a failure without details.");
    }
}
