//! The `client` module is the chat participant side.
//!
//! `ChannelClient` owns one subscription's lifecycle as an explicit state
//! machine fed from a single event queue; `render` turns its output into
//! lines for a terminal (or a transcript); `session` drives a client over a
//! real WebSocket connection.

pub mod channel;
pub mod render;
pub mod session;

pub use channel::{ChannelClient, ClientEvent, ClientState};
pub use render::{Direction, Entry, Render, Terminal, Transcript};
