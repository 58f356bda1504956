//! Connection representation
//!
//! A `Connection` is the transport-owned end of one WebSocket client. It
//! holds the sending side of a bounded per-connection queue that the
//! connection's writer task drains onto the socket. The hub never owns a
//! `Connection`; it keeps a `Subscriber` holding only a weak sender, so a
//! connection dropped by the transport simply stops receiving.
//!
//! A subscriber that fails delivery is evicted: the hub signals the
//! connection, and the transport closes the socket so the client sees the
//! subscription end instead of silently receiving nothing.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::sync::mpsc::{self, Receiver, Sender, WeakSender, error::TrySendError};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::broker::topic::SubscriberId;
use crate::transport::message::ServerMessage;
use crate::utils::{Error, Result};

#[derive(Debug)]
pub struct Connection {
    /// Opaque identifier, unique per accepted socket.
    pub id: SubscriberId,
    sender: Sender<WsMessage>,
    evict: Arc<Notify>,
}

impl Connection {
    /// Wrap an existing sender, generating a fresh connection id.
    pub fn new(sender: Sender<WsMessage>) -> Self {
        Self {
            id: format!("conn-{}", Uuid::new_v4()),
            sender,
            evict: Arc::new(Notify::new()),
        }
    }

    /// Create a connection together with the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, Receiver<WsMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    pub fn downgrade(&self) -> WeakSender<WsMessage> {
        self.sender.downgrade()
    }

    /// The hub-side view of this connection.
    pub fn subscriber(&self) -> Subscriber {
        Subscriber {
            id: self.id.clone(),
            sender: self.downgrade(),
            evict: self.evict.clone(),
        }
    }

    /// Resolves once the hub has given up on this connection. A signal sent
    /// before anyone waits is kept until the next call.
    pub async fn evicted(&self) {
        self.evict.notified().await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a frame addressed to this connection only (acks and errors).
    pub fn reply(&self, msg: &ServerMessage) -> Result<()> {
        let frame = msg.to_frame()?;
        enqueue(&self.id, &self.sender, frame)
    }
}

/// What the hub keeps per subscription.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: SubscriberId,
    sender: WeakSender<WsMessage>,
    evict: Arc<Notify>,
}

impl Subscriber {
    /// Queues `frame` without waiting.
    pub fn deliver(&self, frame: WsMessage) -> Result<()> {
        let sender = self.sender.upgrade().ok_or_else(|| Error::DeliveryFailed {
            connection: self.id.clone(),
            reason: "connection dropped",
        })?;
        enqueue(&self.id, &sender, frame)
    }

    /// Asks the transport to close the connection.
    pub fn evict(&self) {
        self.evict.notify_one();
    }
}

/// Non-blocking push into a connection queue.
///
/// A full queue means the client is not keeping up; it is reported the same
/// way as a closed one so callers can drop the subscriber.
fn enqueue(id: &SubscriberId, sender: &Sender<WsMessage>, frame: WsMessage) -> Result<()> {
    sender.try_send(frame).map_err(|e| Error::DeliveryFailed {
        connection: id.clone(),
        reason: match e {
            TrySendError::Full(_) => "outbound queue full",
            TrySendError::Closed(_) => "connection closed",
        },
    })
}

#[cfg(test)]
mod tests;
