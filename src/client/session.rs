//! Runs a `ChannelClient` over a WebSocket connection.
//!
//! Three tasks feed the client: a writer draining its outbound requests onto
//! the socket, a reader turning server frames into `ClientEvent`s, and the
//! caller-provided input lines. Input is only consumed once the subscription
//! is confirmed, so lines typed early wait instead of being rejected.

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::client::channel::{ChannelClient, ClientEvent, ClientState};
use crate::client::render::Render;
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::utils::Result;

/// Connects to `url`, joins `topic` as `name` and sends every line received
/// on `input`. Returns the renderer once the client is disconnected, either
/// because `input` closed or because the server went away.
pub async fn run<R: Render>(
    url: &str,
    topic: &str,
    name: &str,
    mut input: mpsc::Receiver<String>,
    renderer: R,
) -> Result<R> {
    let (ws_stream, _response) = connect_async(url).await?;
    info!("Connected to {url}");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let (event_tx, mut events) = mpsc::unbounded_channel::<ClientEvent>();

    let writer = spawn(async move {
        while let Some(request) = out_rx.recv().await {
            let frame = match request.to_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Failed to encode request: {e}");
                    continue;
                }
            };
            if let Err(e) = ws_sender.send(frame).await {
                warn!("Failed to send request: {e}");
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    spawn(async move {
        while let Some(frame) = ws_receiver.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => match ServerMessage::parse(text.as_str()) {
                    Ok(msg) => {
                        if let Some(event) = ClientEvent::from_server(msg) {
                            if event_tx.send(event).is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => warn!("Unreadable server frame: {e}"),
                },
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!("Read failed: {e}");
                    break;
                }
            }
        }
        let _ = event_tx.send(ClientEvent::TransportLost);
    });

    let mut client = ChannelClient::new(topic, name, out_tx, renderer);
    client.handle(ClientEvent::Connect);

    while client.state() != ClientState::Disconnected {
        let connected = client.state() == ClientState::Connected;
        tokio::select! {
            Some(event) = events.recv() => client.handle(event),
            line = input.recv(), if connected => match line {
                Some(body) => client.handle(ClientEvent::Send(body)),
                None => client.handle(ClientEvent::Disconnect),
            },
            else => break,
        }
    }

    // Dropping the client closes the request queue; the writer flushes what
    // is left (the unsubscribe) and closes the socket.
    let renderer = client.into_renderer();
    let _ = writer.await;
    Ok(renderer)
}

/// Forwards stdin lines into a channel suitable for `run`.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
    rx
}
