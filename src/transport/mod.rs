//! The `transport` module handles network communication with clients over
//! WebSockets.
//!
//! It defines the JSON protocol spoken between clients and the server and
//! implements the server itself: accepting connections, parsing requests and
//! forwarding them to the hub.

pub mod message;
pub mod websocket;


pub use message::{ClientMessage, ServerMessage, SpeakPayload};
pub use websocket::{bind, serve, start_websocket_server};
