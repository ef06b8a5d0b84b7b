//! Chat-completions wire format shared by OpenAI and OpenRouter.

use crate::error::TranslationError;
use crate::provider::{Endpoints, Provider};
use crate::request::TranslationRequest;
use crate::router::OutboundRequest;
use serde::{Deserialize, Serialize};

pub const TEMPERATURE: f64 = 0.2;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build a chat-completion request: prompt as system message, raw source as user message.
pub fn build_request(
    endpoints: &Endpoints,
    request: &TranslationRequest,
    prompt: &str,
) -> Result<OutboundRequest, TranslationError> {
    let url = match request.provider {
        Provider::OpenRouter => &endpoints.openrouter_api_url,
        _ => &endpoints.openai_api_url,
    };
    let url = reqwest::Url::parse(url).map_err(|e| {
        TranslationError::configuration(format!(
            "Invalid {} endpoint '{}': {}",
            request.provider.display_name(),
            url,
            e
        ))
    })?;

    let mut headers = vec![
        ("Content-Type", "application/json".to_string()),
        ("Authorization", format!("Bearer {}", request.api_key)),
    ];
    if request.provider == Provider::OpenRouter {
        headers.push(("X-Title", endpoints.openrouter_title.clone()));
        headers.push(("HTTP-Referer", endpoints.openrouter_referer.clone()));
    }

    let body = ChatRequest {
        model: request.model(),
        messages: vec![
            Message {
                role: "system",
                content: prompt,
            },
            Message {
                role: "user",
                content: &request.text,
            },
        ],
        temperature: TEMPERATURE,
    };

    Ok(OutboundRequest {
        url,
        headers,
        body: serde_json::to_value(&body).map_err(|e| {
            TranslationError::Protocol(format!("Failed to encode chat request: {}", e))
        })?,
    })
}

/// Extract `choices[0].message.content` from a 2xx body.
pub fn parse_response(provider: Provider, body: &str) -> Result<String, TranslationError> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        TranslationError::Protocol(format!(
            "{} returned malformed JSON: {}",
            provider.display_name(),
            e
        ))
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| {
            TranslationError::Protocol(format!(
                "{} did not return expected content.",
                provider.display_name()
            ))
        })
}
