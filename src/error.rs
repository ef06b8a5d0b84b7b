//! Error types for translation calls.
//!
//! Every failure the core can report to its caller is a [`TranslationError`].
//! Its `Display` output is the human-readable message shown verbatim to the
//! user, so the wording of each variant is part of the contract.

use thiserror::Error;

/// Failure of a translation call.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The request could not be issued at all: unsupported provider,
    /// missing API key, empty text. Never reaches the network.
    #[error("{0}")]
    Configuration(String),

    /// The provider answered with a non-success HTTP status.
    #[error("{provider} API error: {status} {body}")]
    Transport {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The provider answered 2xx but the body did not carry the translation.
    #[error("{0}")]
    Protocol(String),

    /// The request could not be sent (DNS, connection refused, TLS).
    #[error("{provider} request failed: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The relay ran the translation and reported an explicit failure.
    #[error("{0}")]
    Relay(String),
}

impl TranslationError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status carried by a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Result of a translation call: the trimmed translated text or a failure.
pub type TranslationResult = Result<String, TranslationError>;
