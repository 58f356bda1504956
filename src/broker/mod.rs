//! The broadcast hub.
//!
//! - `engine`: the `Hub`, which owns topic membership and fans out messages
//! - `message`: the immutable chat `Message`
//! - `topic`: per-topic subscriber sets and subscription handles

pub mod engine;
pub mod message;
pub mod topic;

pub use engine::Hub;
pub use message::Message;
pub use topic::{SubscriberId, SubscriptionHandle};
