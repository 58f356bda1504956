//! Wire protocol
//!
//! JSON text frames, internally tagged by `"type"`. Clients subscribe to a
//! topic and `perform` actions on it; the only action is `speak`. The server
//! acknowledges subscriptions and pushes chat messages.

use serde::{Deserialize, Serialize};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::Message;
use crate::utils::{Error, Result};

pub const SPEAK: &str = "speak";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "subscribe")]
    Subscribe { topic: String },
    #[serde(rename = "unsubscribe")]
    Unsubscribe { topic: String },
    #[serde(rename = "perform")]
    Perform {
        topic: String,
        action: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl ClientMessage {
    /// Builds a `speak` request carrying `message`.
    pub fn speak(topic: &str, message: &Message) -> Result<Self> {
        let payload = SpeakPayload {
            message: message.body().to_string(),
            sender: Some(message.sender().to_string()),
        };
        Ok(ClientMessage::Perform {
            topic: topic.to_string(),
            action: SPEAK.to_string(),
            payload: serde_json::to_value(payload)?,
        })
    }

    pub fn to_frame(&self) -> Result<WsMessage> {
        Ok(WsMessage::text(serde_json::to_string(self)?))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpeakPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl SpeakPayload {
    /// Interprets a `perform` request. Only `speak` is defined.
    pub fn from_action(action: &str, payload: serde_json::Value) -> Result<Self> {
        if action != SPEAK {
            return Err(Error::UnknownAction(action.to_string()));
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// Validates the payload and turns it into an unstamped `Message`.
    ///
    /// `fallback_sender` is used when the client did not name itself.
    pub fn into_message(self, fallback_sender: &str, max_len: usize) -> Result<Message> {
        let body = self.message.trim();
        if body.is_empty() {
            return Err(Error::EmptyMessage);
        }
        if body.len() > max_len {
            return Err(Error::MessageTooLong { limit: max_len });
        }

        let sender = self
            .sender
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback_sender.to_string());

        Ok(Message::new(sender, body))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "confirm_subscription")]
    ConfirmSubscription { topic: String },
    #[serde(rename = "message")]
    Message {
        topic: String,
        sender: String,
        message: String,
        timestamp: String,
    },
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerMessage {
    pub fn from_message(topic: &str, message: &Message) -> Self {
        ServerMessage::Message {
            topic: topic.to_string(),
            sender: message.sender().to_string(),
            message: message.body().to_string(),
            timestamp: message.timestamp().unwrap_or_default().to_string(),
        }
    }

    pub fn to_frame(&self) -> Result<WsMessage> {
        Ok(WsMessage::text(serde_json::to_string(self)?))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
