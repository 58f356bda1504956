//! Topic management
//!
//! A `Topic` maps each subscriber id to the hub's `Subscriber` view of that
//! connection. Keys are unique, so a connection is a member at most once.
//!
//! Callers must synchronize access (the hub keeps topics inside a sharded
//! map and mutates them under the shard lock).

use std::collections::HashMap;

use crate::connection::Subscriber;

pub type SubscriberId = String;

#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    subscribers: HashMap<SubscriberId, Subscriber>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Add a subscriber. Returns `false` and keeps the existing entry when the
    /// id is already present.
    pub fn subscribe(&mut self, subscriber: Subscriber) -> bool {
        if self.subscribers.contains_key(&subscriber.id) {
            return false;
        }
        self.subscribers.insert(subscriber.id.clone(), subscriber);
        true
    }

    /// Remove a subscriber. Returns whether it was present.
    pub fn unsubscribe(&mut self, id: &SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Copy of the current membership, taken so delivery can happen after
    /// the lock guarding this topic is released.
    pub fn snapshot(&self) -> Vec<Subscriber> {
        self.subscribers.values().cloned().collect()
    }
}

/// Token for one connection's membership in one topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    topic: String,
    connection: SubscriberId,
}

impl SubscriptionHandle {
    pub(crate) fn new(topic: &str, connection: &SubscriberId) -> Self {
        Self {
            topic: topic.to_string(),
            connection: connection.clone(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn connection(&self) -> &SubscriberId {
        &self.connection
    }
}
