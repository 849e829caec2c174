//! Websocket endpoint for the `updateHabits` channel.
//!
//! Each connection runs as its own task holding its own fan-out receiver. On connect the
//! session sends the current snapshot, then forwards every snapshot the fan-out publishes.
//! Client frames other than close are ignored.

use crate::AppState;
use api_shared::encode_update_habits;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use habit_core::Habit;
use tokio::sync::broadcast::error::RecvError;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(socket: WebSocket, state: AppState) {
    // Subscribe before the initial read so no mutation falls between the two.
    let mut updates = state.fanout.subscribe();
    let (mut sender, mut receiver) = socket.split();
    tracing::info!(
        "realtime subscriber connected ({} active)",
        state.fanout.subscriber_count()
    );

    match state.repo.list() {
        Ok(habits) => {
            if send_snapshot(&mut sender, &habits).await.is_err() {
                return;
            }
        }
        Err(e) => tracing::warn!("could not send initial snapshot: {}", e),
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(snapshot) => {
                    if send_snapshot(&mut sender, &snapshot).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("realtime subscriber lagged, skipped {} snapshots", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!("realtime subscriber disconnected");
}

async fn send_snapshot(
    sender: &mut SplitSink<WebSocket, Message>,
    habits: &[Habit],
) -> Result<(), ()> {
    let frame = match encode_update_habits(habits) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("failed to encode habit snapshot: {}", e);
            return Ok(());
        }
    };

    sender.send(Message::Text(frame)).await.map_err(|e| {
        tracing::debug!("realtime send failed: {}", e);
    })
}
