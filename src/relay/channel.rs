//! Transports that carry relay messages.

use crate::relay::handler::handle_relay_request;
use crate::relay::message::{RelayRequest, RelayResponse};
use crate::router::ProviderRouter;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Header carrying the relay's shared secret.
pub const RELAY_SECRET_HEADER: &str = "X-Relay-Secret";

/// The relay itself failed; the bridge falls back instead of surfacing this.
#[derive(Debug, Error)]
pub enum RelayUnavailable {
    #[error("relay unreachable: {0}")]
    Unreachable(String),

    #[error("relay answered with HTTP {0}")]
    Status(u16),

    #[error("relay reply could not be decoded: {0}")]
    Decode(String),

    #[error("relay closed the channel without replying")]
    NoReply,
}

/// A round-trip to a relay: one message out, at most one reply back.
#[async_trait]
pub trait RelayChannel: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn exchange(&self, request: RelayRequest) -> Result<RelayResponse, RelayUnavailable>;
}

/// Relay reached over HTTP (see [`crate::relay::server`]).
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl HttpRelay {
    /// `url` is the full address of the relay's `/translate` route.
    pub fn new(client: reqwest::Client, url: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            secret,
        }
    }
}

#[async_trait]
impl RelayChannel for HttpRelay {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn exchange(&self, request: RelayRequest) -> Result<RelayResponse, RelayUnavailable> {
        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(secret) = &self.secret {
            builder = builder.header(RELAY_SECRET_HEADER, secret);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RelayUnavailable::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayUnavailable::Status(response.status().as_u16()));
        }

        response
            .json::<RelayResponse>()
            .await
            .map_err(|e| RelayUnavailable::Decode(e.to_string()))
    }
}

struct Envelope {
    request: RelayRequest,
    reply: oneshot::Sender<RelayResponse>,
}

/// Relay running as a task in this process.
///
/// Messages go through an `mpsc` queue and each one gets a `oneshot` for
/// its reply. A stopped task or a dropped reply reads as unavailable.
#[derive(Debug, Clone)]
pub struct LocalRelay {
    sender: mpsc::Sender<Envelope>,
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope").field("kind", &self.request.kind).finish()
    }
}

impl LocalRelay {
    /// Spawn the relay task on the current tokio runtime.
    pub fn spawn(router: ProviderRouter) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Envelope>(32);

        tokio::spawn(async move {
            while let Some(envelope) = receiver.recv().await {
                let router = router.clone();
                // Each message runs on its own task; replies may complete in any order.
                tokio::spawn(async move {
                    match handle_relay_request(&router, envelope.request).await {
                        Some(response) => {
                            let _ = envelope.reply.send(response);
                        }
                        None => debug!("Local relay ignored a message without replying"),
                    }
                });
            }
            debug!("Local relay stopped");
        });

        Self { sender }
    }
}

#[async_trait]
impl RelayChannel for LocalRelay {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn exchange(&self, request: RelayRequest) -> Result<RelayResponse, RelayUnavailable> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope { request, reply })
            .await
            .map_err(|_| RelayUnavailable::Unreachable("local relay has stopped".to_string()))?;

        response.await.map_err(|_| RelayUnavailable::NoReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Endpoints, Provider};
    use crate::relay::message::TRANSLATE_REQUEST;
    use crate::request::{TranslationRequest, TranslationSettings};
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn relay_request(provider: Provider) -> RelayRequest {
        let settings = TranslationSettings::new(provider, "sk-x").with_target_language("fr");
        RelayRequest::from(&TranslationRequest::new("Hello", &settings))
    }

    // ==================== HttpRelay Tests ====================

    #[tokio::test]
    async fn test_http_relay_returns_reply_and_sends_secret() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(header(RELAY_SECRET_HEADER, "s3cret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "text": "Bonjour"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let relay = HttpRelay::new(
            reqwest::Client::new(),
            format!("{}/translate", mock_server.uri()),
            Some("s3cret".to_string()),
        );
        let reply = relay.exchange(relay_request(Provider::OpenAi)).await.unwrap();
        assert_eq!(reply, RelayResponse::success("Bonjour"));
    }

    #[tokio::test]
    async fn test_http_relay_non_success_status_is_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let relay = HttpRelay::new(reqwest::Client::new(), mock_server.uri(), None);
        let err = relay
            .exchange(relay_request(Provider::OpenAi))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayUnavailable::Status(502)));
    }

    #[tokio::test]
    async fn test_http_relay_garbage_reply_is_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let relay = HttpRelay::new(reqwest::Client::new(), mock_server.uri(), None);
        let err = relay
            .exchange(relay_request(Provider::OpenAi))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayUnavailable::Decode(_)));
    }

    #[tokio::test]
    async fn test_http_relay_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/translate", listener.local_addr().unwrap());
        drop(listener);

        let relay = HttpRelay::new(reqwest::Client::new(), url, None);
        let err = relay
            .exchange(relay_request(Provider::OpenAi))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayUnavailable::Unreachable(_)));
    }

    // ==================== LocalRelay Tests ====================

    #[tokio::test]
    async fn test_local_relay_runs_translation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": " Bonjour "}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let router =
            ProviderRouter::new(reqwest::Client::new(), Endpoints::with_base(&mock_server.uri()));
        let relay = LocalRelay::spawn(router);

        let reply = relay.exchange(relay_request(Provider::OpenAi)).await.unwrap();
        assert_eq!(reply, RelayResponse::success("Bonjour"));
    }

    #[tokio::test]
    async fn test_local_relay_reports_provider_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&mock_server)
            .await;

        let router =
            ProviderRouter::new(reqwest::Client::new(), Endpoints::with_base(&mock_server.uri()));
        let relay = LocalRelay::spawn(router);

        let reply = relay.exchange(relay_request(Provider::OpenAi)).await.unwrap();
        assert_eq!(reply, RelayResponse::failure("OpenAI API error: 401 bad key"));
    }

    #[tokio::test]
    async fn test_local_relay_ignored_message_reads_as_no_reply() {
        let relay = LocalRelay::spawn(ProviderRouter::default());

        let mut message = relay_request(Provider::OpenAi);
        message.kind = "ping".to_string();
        assert_ne!(message.kind, TRANSLATE_REQUEST);

        let err = relay.exchange(message).await.unwrap_err();
        assert!(matches!(err, RelayUnavailable::NoReply));
    }
}
