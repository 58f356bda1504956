use super::Connection;
use crate::transport::message::ServerMessage;
use crate::utils::Error;
use tungstenite::protocol::Message as WsMessage;

#[test]
fn test_connection_new() {
    let (conn, _rx) = Connection::channel(4);
    assert!(conn.id.starts_with("conn-"));
    assert!(!conn.is_closed());
}

#[test]
fn test_connection_ids_are_unique() {
    let (a, _rx_a) = Connection::channel(1);
    let (b, _rx_b) = Connection::channel(1);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_reply_enqueues_frame() {
    let (conn, mut rx) = Connection::channel(1);
    conn.reply(&ServerMessage::ConfirmSubscription {
        topic: "chat".to_string(),
    })
    .unwrap();

    match rx.try_recv().unwrap() {
        WsMessage::Text(text) => assert!(text.as_str().contains("confirm_subscription")),
        other => panic!("Expected a text message, got {other:?}"),
    }
}

#[test]
fn test_reply_to_full_queue_fails() {
    let (conn, _rx) = Connection::channel(1);
    let msg = ServerMessage::Error {
        message: "boom".to_string(),
    };
    conn.reply(&msg).unwrap();

    match conn.reply(&msg) {
        Err(Error::DeliveryFailed { reason, .. }) => assert_eq!(reason, "outbound queue full"),
        other => panic!("Expected DeliveryFailed, got {other:?}"),
    }
}

#[test]
fn test_weak_sender_does_not_keep_connection_alive() {
    let (conn, _rx) = Connection::channel(1);
    let weak = conn.downgrade();
    assert!(weak.upgrade().is_some());

    drop(conn);
    assert!(weak.upgrade().is_none());
}

#[tokio::test]
async fn test_evict_signal_reaches_connection() {
    let (conn, _rx) = Connection::channel(1);
    let subscriber = conn.subscriber();
    assert_eq!(subscriber.id, conn.id);

    subscriber.evict();

    tokio::time::timeout(std::time::Duration::from_secs(1), conn.evicted())
        .await
        .expect("eviction was not signalled");
}

#[test]
fn test_subscriber_delivery_after_drop_fails() {
    let (conn, _rx) = Connection::channel(1);
    let subscriber = conn.subscriber();
    drop(conn);

    match subscriber.deliver(WsMessage::text("hi")) {
        Err(Error::DeliveryFailed { reason, .. }) => assert_eq!(reason, "connection dropped"),
        other => panic!("Expected DeliveryFailed, got {other:?}"),
    }
}
