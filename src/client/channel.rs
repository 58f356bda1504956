//! Channel client state machine
//!
//! ```text
//! Disconnected --Connect--> Connecting --Confirmed--> Connected
//!       ^                        |                        |
//!       +-------Disconnect / TransportLost----------------+
//! ```
//!
//! Requests for the hub go out through an unbounded queue that the session
//! drains onto the socket; everything the user sees goes through `Render`.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::broker::Message;
use crate::client::render::{Direction, Render};
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::utils::{Error, Result};

pub const CONNECTED_NOTICE: &str = "You are now connected to the chat";
pub const LEFT_NOTICE: &str = "You have left the chat";
pub const LOST_NOTICE: &str = "Disconnected from the chat";

/// Label for this client's own messages.
pub const SELF_LABEL: &str = "You";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Connect,
    Confirmed { topic: String },
    Received(Message),
    Send(String),
    Disconnect,
    TransportLost,
}

impl ClientEvent {
    /// Maps a server frame onto a client event. Error frames carry nothing
    /// the state machine acts on.
    pub fn from_server(msg: ServerMessage) -> Option<Self> {
        match msg {
            ServerMessage::ConfirmSubscription { topic } => Some(ClientEvent::Confirmed { topic }),
            ServerMessage::Message {
                sender,
                message,
                timestamp,
                ..
            } => Some(ClientEvent::Received(Message::with_timestamp(
                sender, message, timestamp,
            ))),
            ServerMessage::Error { message } => {
                debug!("Server reported an error: {message}");
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct ChannelClient<R> {
    topic: String,
    identity: String,
    state: ClientState,
    outbound: UnboundedSender<ClientMessage>,
    renderer: R,
}

impl<R: Render> ChannelClient<R> {
    pub fn new(
        topic: impl Into<String>,
        identity: impl Into<String>,
        outbound: UnboundedSender<ClientMessage>,
        renderer: R,
    ) -> Self {
        Self {
            topic: topic.into(),
            identity: identity.into(),
            state: ClientState::Disconnected,
            outbound,
            renderer,
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Single entry point for every inbound event.
    ///
    /// Rejected sends are dropped here without telling the user.
    pub fn handle(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Connect => {
                if let Err(e) = self.connect() {
                    debug!("Connect failed: {e}");
                }
            }
            ClientEvent::Confirmed { topic } => self.confirmed(&topic),
            ClientEvent::Received(message) => self.on_receive(&message),
            ClientEvent::Send(body) => {
                if let Err(e) = self.send(&body) {
                    debug!("Send ignored: {e}");
                }
            }
            ClientEvent::Disconnect => self.disconnect(),
            ClientEvent::TransportLost => self.transport_lost(),
        }
    }

    /// Requests a subscription. Only meaningful while disconnected.
    pub fn connect(&mut self) -> Result<()> {
        if self.state != ClientState::Disconnected {
            return Ok(());
        }
        self.submit(ClientMessage::Subscribe {
            topic: self.topic.clone(),
        })?;
        self.state = ClientState::Connecting;
        Ok(())
    }

    /// Submits `body` to the hub and echoes it locally as sent.
    pub fn send(&mut self, body: &str) -> Result<()> {
        if self.state != ClientState::Connected {
            return Err(Error::NotConnected);
        }
        let body = body.trim();
        if body.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let message = Message::new(self.identity.clone(), body);
        self.submit(ClientMessage::speak(&self.topic, &message)?)?;
        self.renderer.message(SELF_LABEL, &message, Direction::Sent);
        Ok(())
    }

    /// Renders a delivered message under its sender's name.
    pub fn on_receive(&mut self, message: &Message) {
        self.renderer.message(message.sender(), message, Direction::Received);
    }

    /// Leaves the topic.
    pub fn disconnect(&mut self) {
        if self.state == ClientState::Disconnected {
            return;
        }
        let request = ClientMessage::Unsubscribe {
            topic: self.topic.clone(),
        };
        if self.outbound.send(request).is_err() {
            debug!("Unsubscribe not sent, transport already gone");
        }
        self.state = ClientState::Disconnected;
        self.renderer.notice(LEFT_NOTICE);
    }

    fn confirmed(&mut self, topic: &str) {
        if self.state != ClientState::Connecting || topic != self.topic {
            debug!("Ignoring confirmation for {topic} in state {:?}", self.state);
            return;
        }
        self.state = ClientState::Connected;
        self.renderer.notice(CONNECTED_NOTICE);
    }

    fn transport_lost(&mut self) {
        if self.state == ClientState::Disconnected {
            return;
        }
        self.state = ClientState::Disconnected;
        self.renderer.notice(LOST_NOTICE);
    }

    fn submit(&mut self, request: ClientMessage) -> Result<()> {
        if self.outbound.send(request).is_err() {
            self.transport_lost();
            return Err(Error::TransportClosed);
        }
        Ok(())
    }
}
