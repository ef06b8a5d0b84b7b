//! Relay-first translation with direct fallback.
//!
//! The bridge asks the relay first. Three outcomes:
//! - relay answered with text: done
//! - relay answered with an explicit error: that error is the result
//! - relay unavailable or silent: call the provider directly
//!
//! Only the last case falls back. A relay error means the relay ran and the
//! backend refused, so a direct call must not mask it.

use crate::error::TranslationResult;
use crate::relay::{RelayChannel, RelayRequest};
use crate::request::{TranslationRequest, TranslationSettings};
use crate::router::ProviderRouter;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RelayBridge {
    relay: Option<Arc<dyn RelayChannel>>,
    router: ProviderRouter,
}

impl RelayBridge {
    /// Bridge without a relay: every call goes straight to the provider.
    pub fn direct(router: ProviderRouter) -> Self {
        Self {
            relay: None,
            router,
        }
    }

    pub fn with_relay(router: ProviderRouter, relay: Arc<dyn RelayChannel>) -> Self {
        Self {
            relay: Some(relay),
            router,
        }
    }

    pub fn has_relay(&self) -> bool {
        self.relay.is_some()
    }

    /// Translate `text` with the given settings.
    pub async fn translate(&self, text: &str, settings: &TranslationSettings) -> TranslationResult {
        let request = TranslationRequest::new(text, settings);
        self.translate_request(&request).await
    }

    pub async fn translate_request(&self, request: &TranslationRequest) -> TranslationResult {
        request.validate()?;
        with_fallback(self.try_relay(request), || self.direct_call(request)).await
    }

    /// First stage: `None` when the relay is missing, failed, or gave nothing usable.
    pub async fn try_relay(&self, request: &TranslationRequest) -> Option<TranslationResult> {
        let relay = self.relay.as_ref()?;

        match relay.exchange(RelayRequest::from(request)).await {
            Ok(response) => {
                let outcome = response.into_outcome();
                match &outcome {
                    Some(Ok(_)) => debug!("Relay ({}) returned a translation", relay.name()),
                    Some(Err(e)) => debug!("Relay ({}) reported failure: {}", relay.name(), e),
                    None => warn!(
                        "Relay ({}) reply carried no text, falling back to direct call",
                        relay.name()
                    ),
                }
                outcome
            }
            Err(e) => {
                warn!(
                    "Relay ({}) unavailable, falling back to direct call: {}",
                    relay.name(),
                    e
                );
                None
            }
        }
    }

    /// Second stage: call the provider from this process.
    pub async fn direct_call(&self, request: &TranslationRequest) -> TranslationResult {
        self.router.translate(request).await
    }
}

/// Use the relayed outcome when there is one, otherwise run `direct`.
pub async fn with_fallback<R, D, Fut>(relayed: R, direct: D) -> TranslationResult
where
    R: Future<Output = Option<TranslationResult>>,
    D: FnOnce() -> Fut,
    Fut: Future<Output = TranslationResult>,
{
    match relayed.await {
        Some(outcome) => outcome,
        None => direct().await,
    }
}
