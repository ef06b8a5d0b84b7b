//! Gemini `generateContent` wire format.

use crate::error::TranslationError;
use crate::provider::Endpoints;
use crate::request::TranslationRequest;
use crate::router::OutboundRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Build a `generateContent` request.
///
/// The API key travels in the `key` query parameter; the prompt and the
/// source text are joined by a blank line into a single user message.
/// The model id is escaped as one path segment.
pub fn build_request(
    endpoints: &Endpoints,
    request: &TranslationRequest,
    prompt: &str,
) -> Result<OutboundRequest, TranslationError> {
    let invalid = |detail: String| {
        TranslationError::configuration(format!(
            "Invalid Gemini endpoint '{}': {}",
            endpoints.gemini_api_url, detail
        ))
    };

    let mut url =
        reqwest::Url::parse(&endpoints.gemini_api_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("not a base URL".to_string()))?
        .pop_if_empty()
        .push("models")
        .push(&format!("{}:generateContent", request.model()));
    url.query_pairs_mut().append_pair("key", &request.api_key);

    let text = format!("{}\n\n{}", prompt, request.text);
    let body = GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: &text }],
        }],
    };

    Ok(OutboundRequest {
        url,
        headers: vec![("Content-Type", "application/json".to_string())],
        body: serde_json::to_value(&body).map_err(|e| {
            TranslationError::Protocol(format!("Failed to encode Gemini request: {}", e))
        })?,
    })
}

/// Extract `candidates[0].content.parts[0].text` from a 2xx body.
pub fn parse_response(body: &str) -> Result<String, TranslationError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        TranslationError::Protocol(format!("Gemini returned malformed JSON: {}", e))
    })?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            TranslationError::Protocol("Gemini returned an unexpected response.".to_string())
        })
}
