//! Hub engine
//!
//! The in-memory hub responsible for:
//! - managing topics and their subscriber sets
//! - fanning published messages out to every current subscriber
//! - dropping subscribers whose delivery fails
//!
//! Concurrency notes:
//! - `Hub` is `Send + Sync` and meant to be shared as `Arc<Hub>`. Topics live
//!   in a sharded `DashMap`, so membership changes on one topic are atomic
//!   with respect to a publish on that topic.
//! - Publish copies the subscriber set under the shard lock and delivers
//!   after releasing it. Delivery is a non-blocking `try_send` into each
//!   connection's bounded queue, so a stalled client never blocks the hub.
//!   A subscriber that fails delivery is removed and evicted.
//! - The reverse index is only updated while the topic's shard guard is
//!   held (topics first, then memberships), so it always agrees with the
//!   topic sets.

use std::collections::HashSet;

use dashmap::DashMap;
use tracing::{debug, error, info, warn};

use crate::broker::message::Message;
use crate::broker::topic::{SubscriberId, SubscriptionHandle, Topic};
use crate::connection::Connection;
use crate::transport::message::ServerMessage;

#[derive(Debug, Default)]
pub struct Hub {
    topics: DashMap<String, Topic>,
    /// Reverse index used to tear a connection out of every topic at once.
    memberships: DashMap<SubscriberId, HashSet<String>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a connection to a topic, creating the topic if needed.
    ///
    /// Subscribing twice is a no-op that returns an equal handle.
    pub fn subscribe(&self, topic: &str, connection: &Connection) -> SubscriptionHandle {
        let mut entry = self
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic));
        let added = entry.subscribe(connection.subscriber());
        self.memberships
            .entry(connection.id.clone())
            .or_default()
            .insert(topic.to_string());
        drop(entry);

        if added {
            info!("{} subscribed to {topic}", connection.id);
        } else {
            debug!("{} already subscribed to {topic}", connection.id);
        }

        SubscriptionHandle::new(topic, &connection.id)
    }

    /// Removes the registration behind `handle`. Unknown handles are ignored.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) {
        if self.remove_member(handle.topic(), handle.connection()) {
            info!("{} unsubscribed from {}", handle.connection(), handle.topic());
        }
    }

    /// Delivers `message` to every connection subscribed to `topic`.
    ///
    /// Fills in the timestamp when absent. Returns the number of connections
    /// the message was queued for; zero subscribers means the message is
    /// dropped.
    pub fn publish(&self, topic: &str, message: Message) -> usize {
        self.fan_out(topic, message, None)
    }

    /// Like `publish`, but skips `origin`. Senders render their own messages
    /// locally, so echoing them back would display them twice.
    pub fn publish_from(&self, origin: &SubscriberId, topic: &str, message: Message) -> usize {
        self.fan_out(topic, message, Some(origin))
    }

    /// Removes a connection from every topic it belongs to.
    pub fn disconnect(&self, connection: &SubscriberId) {
        let topics = self
            .memberships
            .remove(connection)
            .map(|(_, topics)| topics)
            .unwrap_or_default();

        for topic in &topics {
            if let Some(mut t) = self.topics.get_mut(topic) {
                t.unsubscribe(connection);
            }
            self.topics.remove_if(topic, |_, t| t.is_empty());
        }

        info!("Cleaned up {connection} ({} subscriptions)", topics.len());
    }

    pub fn is_subscribed(&self, topic: &str, connection: &SubscriberId) -> bool {
        self.topics
            .get(topic)
            .is_some_and(|t| t.contains(connection))
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map(|t| t.len()).unwrap_or(0)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn fan_out(&self, topic: &str, message: Message, origin: Option<&SubscriberId>) -> usize {
        let message = message.stamped();

        let subscribers = match self.topics.get(topic) {
            Some(t) => t.snapshot(),
            None => {
                debug!("Topic '{topic}' has no subscribers, dropping message");
                return 0;
            }
        };

        let frame = match ServerMessage::from_message(topic, &message).to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to serialize message: {e}");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut failed = Vec::new();

        for subscriber in subscribers {
            if origin == Some(&subscriber.id) {
                continue;
            }
            match subscriber.deliver(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("{e}; evicting from {topic}");
                    failed.push(subscriber);
                }
            }
        }

        for subscriber in &failed {
            self.remove_member(topic, &subscriber.id);
            subscriber.evict();
        }

        debug!(
            "Published to {topic}: {delivered} delivered, {} dropped",
            failed.len()
        );
        delivered
    }

    fn remove_member(&self, topic: &str, connection: &SubscriberId) -> bool {
        let removed = match self.topics.get_mut(topic) {
            Some(mut t) => {
                let removed = t.unsubscribe(connection);
                if removed {
                    if let Some(mut topics) = self.memberships.get_mut(connection) {
                        topics.remove(topic);
                    }
                    self.memberships.remove_if(connection, |_, t| t.is_empty());
                }
                removed
            }
            None => false,
        };
        self.topics.remove_if(topic, |_, t| t.is_empty());

        removed
    }

    /// Topics `connection` is recorded under in the reverse index.
    #[cfg(test)]
    pub(crate) fn memberships_of(&self, connection: &SubscriberId) -> HashSet<String> {
        self.memberships
            .get(connection)
            .map(|topics| topics.clone())
            .unwrap_or_default()
    }
}
