//! WebSocket transport
//!
//! Minimal WebSocket server that translates protocol JSON into hub
//! operations. For each accepted socket it:
//! - creates a `Connection` with a bounded outbound queue
//! - spawns a writer task that drains the queue onto the socket, giving up
//!   when a single write exceeds the configured timeout
//! - reads requests until the client goes away or the hub evicts it, then
//!   removes the connection from every topic and closes the socket

use std::sync::Arc;

use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::time::timeout;
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{Hub, SubscriptionHandle};
use crate::config::{HubSettings, Settings};
use crate::connection::Connection;
use crate::transport::message::{ClientMessage, ServerMessage, SpeakPayload};
use crate::utils::Result;

pub async fn start_websocket_server(addr: String, hub: Arc<Hub>, settings: Settings) -> Result<()> {
    let listener = bind(&addr).await?;
    serve(listener, hub, settings.hub).await;
    Ok(())
}

pub async fn bind(addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    Ok(listener)
}

/// Accepts connections forever, one task per client.
pub async fn serve(listener: TcpListener, hub: Arc<Hub>, settings: HubSettings) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("Accepted TCP connection from {peer}");
                spawn(handle_connection(stream, hub.clone(), settings.clone()));
            }
            Err(e) => error!("Failed to accept connection: {e}"),
        }
    }
}

async fn handle_connection(stream: TcpStream, hub: Arc<Hub>, settings: HubSettings) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake error: {e}");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (connection, mut rx) = Connection::channel(settings.outbound_buffer);
    let client_id = connection.id.clone();
    info!("{client_id} connected");

    let write_timeout = settings.write_timeout();
    let mut writer = {
        let client_id = client_id.clone();
        spawn(async move {
            while let Some(msg) = rx.recv().await {
                match timeout(write_timeout, ws_sender.send(msg)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        warn!("Failed to send message to {client_id}: {e}");
                        break;
                    }
                    Err(_) => {
                        warn!("Write to {client_id} timed out after {write_timeout:?}");
                        break;
                    }
                }
            }
            let _ = timeout(write_timeout, ws_sender.close()).await;
            debug!("Send loop closed for {client_id}");
        })
    };

    tokio::select! {
        _ = read_loop(&mut ws_receiver, &hub, &connection, &settings) => {}
        _ = &mut writer => {}
        _ = connection.evicted() => {
            warn!("{client_id} fell behind and was evicted, closing");
        }
    }

    hub.disconnect(&client_id);
    // last strong sender; lets the writer drain and exit
    drop(connection);
    if !writer.is_finished() {
        let _ = writer.await;
    }

    info!("{client_id} disconnected");
}

async fn read_loop(
    ws_receiver: &mut SplitStream<WebSocketStream<TcpStream>>,
    hub: &Hub,
    connection: &Connection,
    settings: &HubSettings,
) {
    while let Some(frame) = ws_receiver.next().await {
        let text = match frame {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!("Read from {} failed: {e}", connection.id);
                break;
            }
        };

        if let Err(e) = handle_client_message(hub, connection, settings, text.as_str()) {
            warn!(
                "Invalid client message from {}: {e} | {}",
                connection.id,
                text.chars().take(100).collect::<String>()
            );
            let _ = connection.reply(&ServerMessage::Error {
                message: e.to_string(),
            });
        }
    }
}

/// Applies one client request to the hub.
pub fn handle_client_message(
    hub: &Hub,
    connection: &Connection,
    settings: &HubSettings,
    text: &str,
) -> Result<()> {
    match serde_json::from_str::<ClientMessage>(text)? {
        ClientMessage::Subscribe { topic } => {
            hub.subscribe(&topic, connection);
            connection.reply(&ServerMessage::ConfirmSubscription { topic })?;
        }
        ClientMessage::Unsubscribe { topic } => {
            hub.unsubscribe(&SubscriptionHandle::new(&topic, &connection.id));
        }
        ClientMessage::Perform {
            topic,
            action,
            payload,
        } => {
            let message = SpeakPayload::from_action(&action, payload)?
                .into_message(&connection.id, settings.max_message_len)?;
            let delivered = hub.publish_from(&connection.id, &topic, message);
            debug!("{} spoke on {topic}, reached {delivered}", connection.id);
        }
    }
    Ok(())
}
