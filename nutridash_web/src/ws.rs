//! Publish/subscribe channel to browser clients.
//!
//! Every message on the wire is `{"event": <name>, "data": <payload>}`.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use nutridash_core::DeliveryReceiver;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::state::AppState;

pub const NEW_RECORD_EVENT: &str = "new_record";
pub const UPDATE_DATA_EVENT: &str = "update_data";
pub const REFRESH_REQUEST: &str = "refresh_data";

pub fn encode_event<T: Serialize>(event: &str, data: &T) -> serde_json::Result<String> {
    serde_json::to_string(&json!({ "event": event, "data": data }))
}

/// Accepts the bare `refresh_data` text or `{"event":"refresh_data"}`.
#[must_use]
pub fn is_refresh_request(text: &str) -> bool {
    let text = text.trim();
    if text == REFRESH_REQUEST {
        return true;
    }
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("event").and_then(Value::as_str).map(|e| e == REFRESH_REQUEST))
        .unwrap_or_default()
}

/// Forward every record from the listener's delivery queue to all
/// connected clients. Ends when the queue closes.
pub fn spawn_relay(
    mut delivery: DeliveryReceiver,
    events: broadcast::Sender<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(record) = delivery.recv().await {
            match encode_event(NEW_RECORD_EVENT, &record) {
                Ok(text) => {
                    if events.send(text).is_err() {
                        debug!("No clients subscribed, record {} not pushed", record.id);
                    }
                }
                Err(e) => warn!("Failed to encode record {}: {e}", record.id),
            }
        }
        debug!("Delivery queue closed, relay stopped");
    })
}

/// Build the dashboard payload and broadcast it to every client.
///
/// Returns how many clients the update reached.
#[must_use]
pub async fn broadcast_update(state: &AppState) -> usize {
    let store = match state.store() {
        Ok(store) => store,
        Err(e) => {
            debug!("Ignoring refresh request: {e}");
            return 0;
        }
    };

    let update = match store.dashboard_update().await {
        Ok(update) => update,
        Err(e) => {
            warn!("Failed to build dashboard update: {e}");
            return 0;
        }
    };

    match encode_event(UPDATE_DATA_EVENT, &update) {
        Ok(text) => state.events.send(text).unwrap_or_else(|_| {
            debug!("No clients subscribed, dashboard update not pushed");
            0
        }),
        Err(e) => {
            warn!("Failed to encode dashboard update: {e}");
            0
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| client_session(socket, state))
}

async fn client_session(socket: WebSocket, state: Arc<AppState>) {
    info!("Client connected");
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();

    let mut push = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Client lagging, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let pull_state = Arc::clone(&state);
    let mut pull = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) if is_refresh_request(text.as_str()) => {
                    let reached = broadcast_update(&pull_state).await;
                    debug!("Refresh pushed to {reached} clients");
                }
                Message::Text(text) => debug!("Ignoring client frame: {}", text.as_str()),
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut push => pull.abort(),
        _ = &mut pull => push.abort(),
    }
    info!("Client disconnected");
}
