//! # chathub
//!
//! `chathub` is a small real-time chat system built around an in-memory
//! broadcast hub. Clients connect over WebSockets, subscribe to a topic
//! (`"chat"` by default) and every message spoken on that topic is fanned out
//! to all connections subscribed at that moment. Nothing is persisted.
//!
//! ## Core Modules
//!
//! - `broker`: the `Hub`, which manages topics and subscriber sets and routes messages.
//! - `client`: the chat participant: state machine, rendering and a WebSocket session.
//! - `config`: loading server and hub configuration.
//! - `connection`: the transport-owned handle for one connected socket.
//! - `transport`: the JSON protocol and the WebSocket server.
//! - `utils`: error type and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod connection;
pub mod transport;
pub mod utils;
