//! Chat message
//!
//! A `Message` is immutable once built: fields are private and only exposed
//! through accessors. The timestamp is an RFC 3339 UTC string with second
//! precision. Clients leave it empty and the hub fills it on publish.

use chrono::{SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    sender: String,
    body: String,
    timestamp: String,
}

impl Message {
    /// A message without a timestamp yet.
    pub fn new(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp: String::new(),
        }
    }

    pub fn with_timestamp(
        sender: impl Into<String>,
        body: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// `None` until the hub has stamped the message.
    pub fn timestamp(&self) -> Option<&str> {
        if self.timestamp.is_empty() {
            None
        } else {
            Some(&self.timestamp)
        }
    }

    /// Returns the message with its timestamp set to now, unless it already
    /// carries one.
    pub fn stamped(self) -> Self {
        if self.timestamp.is_empty() {
            Self {
                timestamp: now_iso8601(),
                ..self
            }
        } else {
            self
        }
    }
}

pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
