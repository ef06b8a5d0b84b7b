//! HTTP relay process.
//!
//! Runs provider calls on behalf of clients that cannot reach the backends
//! themselves:
//! - `POST /translate` - relay message in, relay response out
//! - `GET /health` - liveness probe

use crate::relay::channel::RELAY_SECRET_HEADER;
use crate::relay::handler::handle_relay_request;
use crate::relay::message::RelayRequest;
use crate::router::ProviderRouter;
use crate::security::constant_time_compare;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state of the relay server.
pub struct RelayState {
    pub router: ProviderRouter,
    /// When set, callers must present it in `X-Relay-Secret`.
    pub secret: Option<String>,
}

impl RelayState {
    pub fn new(router: ProviderRouter, secret: Option<String>) -> Self {
        Self { router, secret }
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        match &self.secret {
            None => true,
            Some(expected) => headers
                .get(RELAY_SECRET_HEADER)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|provided| constant_time_compare(provided, expected)),
        }
    }
}

pub fn create_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn translate(
    State(state): State<Arc<RelayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.is_authorized(&headers) {
        warn!("Rejected relay request with missing or invalid secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid relay secret"})),
        )
            .into_response();
    }

    // Parsed only once the caller is authorized.
    let message: RelayRequest = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            warn!("Rejected malformed relay message: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("invalid relay message: {}", e)})),
            )
                .into_response();
        }
    };

    let kind = message.kind.clone();
    match handle_relay_request(&state.router, message).await {
        Some(reply) => Json(reply).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("unsupported message type: {}", kind)})),
        )
            .into_response(),
    }
}

/// Serve the relay on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<RelayState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Relay listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Relay stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Endpoints;
    use crate::relay::message::RelayResponse;
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    /// Start the relay on an ephemeral port and return its base URL.
    async fn start_relay(router: ProviderRouter, secret: Option<&str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(RelayState::new(router, secret.map(str::to_string)));
        tokio::spawn(serve(listener, state, std::future::pending()));
        format!("http://{}", addr)
    }

    fn message(provider: &str) -> serde_json::Value {
        json!({
            "type": "translate-request",
            "text": "Hello",
            "provider": provider,
            "apiKey": "sk-x",
            "targetLanguage": "fr"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let base = start_relay(ProviderRouter::default(), None).await;
        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_translate_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Bonjour"}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let router =
            ProviderRouter::new(reqwest::Client::new(), Endpoints::with_base(&mock_server.uri()));
        let base = start_relay(router, None).await;

        let reply: RelayResponse = reqwest::Client::new()
            .post(format!("{}/translate", base))
            .json(&message("openai"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(reply, RelayResponse::success("Bonjour"));
    }

    #[tokio::test]
    async fn test_translate_provider_failure_is_ok_false_with_200() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&mock_server)
            .await;

        let router =
            ProviderRouter::new(reqwest::Client::new(), Endpoints::with_base(&mock_server.uri()));
        let base = start_relay(router, None).await;

        let response = reqwest::Client::new()
            .post(format!("{}/translate", base))
            .json(&message("openrouter"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let reply: RelayResponse = response.json().await.unwrap();
        assert_eq!(
            reply,
            RelayResponse::failure("OpenRouter API error: 429 slow down")
        );
    }

    #[tokio::test]
    async fn test_secret_required() {
        let base = start_relay(ProviderRouter::default(), Some("s3cret")).await;
        let client = reqwest::Client::new();

        let missing = client
            .post(format!("{}/translate", base))
            .json(&message("deepl"))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), 401);

        let wrong = client
            .post(format!("{}/translate", base))
            .header(RELAY_SECRET_HEADER, "nope")
            .json(&message("deepl"))
            .send()
            .await
            .unwrap();
        assert_eq!(wrong.status(), 401);

        let right = client
            .post(format!("{}/translate", base))
            .header(RELAY_SECRET_HEADER, "s3cret")
            .json(&message("deepl"))
            .send()
            .await
            .unwrap();
        assert_eq!(right.status(), 200);
        let reply: RelayResponse = right.json().await.unwrap();
        assert_eq!(reply, RelayResponse::failure("Unsupported provider: deepl"));
    }

    #[tokio::test]
    async fn test_unknown_message_type_is_bad_request() {
        let base = start_relay(ProviderRouter::default(), None).await;
        let response = reqwest::Client::new()
            .post(format!("{}/translate", base))
            .json(&json!({"type": "ping"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_secret_checked_before_body_is_parsed() {
        let base = start_relay(ProviderRouter::default(), Some("s3cret")).await;
        let client = reqwest::Client::new();

        let anonymous = client
            .post(format!("{}/translate", base))
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(anonymous.status(), 401);

        let authorized = client
            .post(format!("{}/translate", base))
            .header(RELAY_SECRET_HEADER, "s3cret")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(authorized.status(), 400);
    }
}
