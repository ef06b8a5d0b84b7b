use crate::relay::message::{RelayRequest, RelayResponse};
use crate::router::ProviderRouter;
use tracing::{debug, warn};

/// Serve one relay message.
///
/// Returns `None` for messages that are not translation requests; those get
/// no reply at all. Everything else gets exactly one reply: the translated
/// text, or the failure message of whatever went wrong.
pub async fn handle_relay_request(
    router: &ProviderRouter,
    message: RelayRequest,
) -> Option<RelayResponse> {
    if !message.is_translate() {
        debug!("Ignoring relay message of type '{}'", message.kind);
        return None;
    }

    let request = match message.into_translation_request() {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected relay request: {}", e);
            return Some(RelayResponse::failure(e.to_string()));
        }
    };

    let result = router.translate(&request).await;
    if let Err(e) = &result {
        warn!("Relayed translation via {} failed: {}", request.provider, e);
    }
    Some(result.into())
}
