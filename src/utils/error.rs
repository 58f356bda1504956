//! The `error` module defines the error types used within `chathub`.
//!
//! None of these are fatal to the hub. Delivery failures are absorbed by
//! dropping the failing subscriber, and the client swallows rejected sends.

use thiserror::Error;

use crate::broker::topic::SubscriberId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("delivery to {connection} failed: {reason}")]
    DeliveryFailed {
        connection: SubscriberId,
        reason: &'static str,
    },

    #[error("message body is empty")]
    EmptyMessage,

    #[error("message body exceeds {limit} bytes")]
    MessageTooLong { limit: usize },

    #[error("not connected")]
    NotConnected,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("transport closed")]
    TransportClosed,
}
