//! End-to-end tests for the device and observer WebSockets using a real client.

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use trainerd_core::SessionSummary;
use trainerd_server::{config::Config, routes, state::AppState};
use trainerd_types::{OperatorCommand, SlotId, Target};

const TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Serve the full router on an ephemeral port.
async fn boot_server() -> (String, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = routes::router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("ws://{addr}/ws"), state)
}

async fn connect(url: &str) -> WsStream {
    let (ws, _response) = connect_async(url).await.unwrap();
    ws
}

/// Connect an observer and wait until it is subscribed to presentation events.
async fn connect_observer(base: &str, state: &AppState) -> WsStream {
    let ws = connect(&format!("{base}/events")).await;
    timeout(TIMEOUT, async {
        while state.events.receiver_count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    ws
}

async fn next_text(ws: &mut WsStream) -> String {
    timeout(TIMEOUT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_string(),
                Some(Ok(_)) => continue,
                other => panic!("socket ended early: {:?}", other),
            }
        }
    })
    .await
    .unwrap()
}

async fn next_event(ws: &mut WsStream) -> Value {
    serde_json::from_str(&next_text(ws).await).unwrap()
}

async fn wait_for_sessions(state: &AppState, count: usize) -> Vec<SessionSummary> {
    timeout(TIMEOUT, async {
        loop {
            let sessions = state.console.list_sessions().await.unwrap();
            if sessions.len() == count {
                return sessions;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_device_lifecycle_over_websocket() {
    let (base, state) = boot_server().await;
    let mut observer = connect_observer(&base, &state).await;

    let mut device = connect(&format!("{base}/device")).await;
    let created = next_event(&mut observer).await;
    assert_eq!(created["type"], "session_created");
    assert_eq!(created["slot"], 0);
    let connection = created["connection"].as_u64().unwrap();

    // Frames are applied in arrival order; binary messages are ignored
    device.send(Message::Text("module3".into())).await.unwrap();
    device.send(Message::Binary(vec![0u8, 1, 2].into())).await.unwrap();
    device.send(Message::Text("module5".into())).await.unwrap();
    device.send(Message::Text("request".into())).await.unwrap();

    assert_eq!(
        next_event(&mut observer).await,
        json!({ "type": "module_label_changed", "slot": 0, "text": "3" })
    );
    assert_eq!(
        next_event(&mut observer).await,
        json!({ "type": "module_label_changed", "slot": 0, "text": "5" })
    );
    assert_eq!(
        next_event(&mut observer).await,
        json!({ "type": "attention_requested", "slot": 0 })
    );

    let sessions = wait_for_sessions(&state, 1).await;
    assert_eq!(sessions[0].connection.0, connection);
    assert_eq!(sessions[0].labels.module.as_deref(), Some("5"));
    assert!(sessions[0].attention_requested);

    // Operator commands reach the device socket
    let report = state
        .console
        .execute(Target::All, OperatorCommand::RunModule { input: "4".into() })
        .await
        .unwrap();
    assert_eq!(report.sent, 1);
    assert_eq!(next_text(&mut device).await, "module4");

    // Closing unregisters the peer before the session is destroyed
    device.close(None).await.unwrap();
    assert_eq!(
        next_event(&mut observer).await,
        json!({ "type": "session_destroyed", "slot": 0 })
    );
    assert_eq!(state.transport.peer_count(), 0);
    wait_for_sessions(&state, 0).await;

    // The freed slot goes to the next device
    let _next = connect(&format!("{base}/device")).await;
    let created = next_event(&mut observer).await;
    assert_eq!(created["type"], "session_created");
    assert_eq!(created["slot"], 0);
    assert_ne!(created["connection"].as_u64().unwrap(), connection);
}

#[tokio::test]
async fn test_detail_view_over_websocket() {
    let (base, state) = boot_server().await;
    let mut observer = connect_observer(&base, &state).await;

    let mut first = connect(&format!("{base}/device")).await;
    next_event(&mut observer).await;
    let mut second = connect(&format!("{base}/device")).await;
    next_event(&mut observer).await;
    wait_for_sessions(&state, 2).await;

    state.console.select(SlotId(1)).await.unwrap();
    assert_eq!(next_text(&mut second).await, "watch");

    // Only the device in the detail view has its debug readout presented
    first.send(Message::Text("debug,22,30".into())).await.unwrap();
    second.send(Message::Text("debug,22,72".into())).await.unwrap();
    assert_eq!(
        next_event(&mut observer).await,
        json!({ "type": "debug_field_updated", "slot": 1, "field": "frame_rate", "text": "72" })
    );

    let report = state
        .console
        .execute(Target::Selected, OperatorCommand::SetPilotId { id: "P-7".into() })
        .await
        .unwrap();
    assert_eq!(report.sent, 1);
    assert_eq!(next_text(&mut second).await, "pilotID:P-7");

    state.console.deselect().await.unwrap();
    assert_eq!(next_text(&mut second).await, "stop");

    let report = state
        .console
        .execute(Target::All, OperatorCommand::NextModule)
        .await
        .unwrap();
    assert_eq!(report.sent, 2);
    assert_eq!(next_text(&mut first).await, "next");
    assert_eq!(next_text(&mut second).await, "next");
}
