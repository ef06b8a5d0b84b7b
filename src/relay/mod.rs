//! Relay: an intermediary that performs provider calls on the caller's behalf.
//!
//! - `message`: the request/response wire format
//! - `channel`: transports to reach a relay (HTTP or in-process)
//! - `handler`: what a relay does with one message
//! - `server`: the HTTP relay process

pub mod channel;
pub mod handler;
pub mod message;
pub mod server;

pub use channel::{HttpRelay, LocalRelay, RelayChannel, RelayUnavailable, RELAY_SECRET_HEADER};
pub use handler::handle_relay_request;
pub use message::{RelayRequest, RelayResponse, TRANSLATE_REQUEST};
pub use server::{create_router, serve, RelayState};
