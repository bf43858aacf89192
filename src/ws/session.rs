//! WebSocket session management
//!
//! Each accepted socket is split into a listen task (inbound frames,
//! processed strictly in order) and a write task (everything the session
//! sends, fed by an internal channel). The registry holds a clone of the
//! write channel for every room the connection joined.

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};

use super::gateway::process_frame;
use super::registry::{ConnectionHandle, SessionSignal};
use super::rooms::resolve_rooms;
use super::{CLOSE_POLICY_VIOLATION, IDLE_TIMEOUT_SECONDS};
use crate::core::AppState;
use crate::entities::{RoomId, User};

/// Entry point for a freshly-upgraded socket.
///
/// `identity` is the output of the authentication collaborator: the user
/// id from a valid token, or `None`. An unauthenticated connect is
/// closed with the policy-violation code before any room is joined, and
/// an identity that does not resolve to a stored account is treated the
/// same way (the resolver fails closed).
#[instrument(skip(ws, state))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, identity: Option<i32>) {
    let Some(user_id) = identity else {
        info!("unauthenticated connection rejected");
        reject(ws, CLOSE_POLICY_VIOLATION, "authentication required").await;
        return;
    };

    let user = match state.store.find_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(user_id, "connection token does not resolve to an account");
            reject(ws, CLOSE_POLICY_VIOLATION, "authentication required").await;
            return;
        }
        Err(err) => {
            error!(user_id, "failed to resolve connection identity: {err}");
            reject(ws, super::CLOSE_INTERNAL_ERROR, "could not resolve identity").await;
            return;
        }
    };

    let rooms = match resolve_rooms(state.store.as_ref(), user.user_id).await {
        Ok(rooms) => rooms,
        Err(err) => {
            error!(user_id, "failed to resolve rooms: {err}");
            reject(ws, super::CLOSE_INTERNAL_ERROR, "could not resolve chat rooms").await;
            return;
        }
    };

    info!(user_id, rooms = rooms.len(), "WebSocket connection established");

    let (internal_tx, internal_rx) = unbounded_channel::<SessionSignal>();
    let conn = ConnectionHandle::new(internal_tx.clone());
    for room in &rooms {
        state.registry.join(*room, &conn);
    }

    let (ws_tx, ws_rx) = ws.split();
    tokio::spawn(write_session(user.user_id, ws_tx, internal_rx));
    tokio::spawn(listen_session(user, ws_rx, internal_tx, conn.conn_id(), rooms, state));
}

async fn reject(mut ws: WebSocket, code: u16, reason: &'static str) {
    let _ = ws
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: Utf8Bytes::from(reason),
        })))
        .await;
}

/// Forwards everything the session sends: broadcast frames from the
/// registry, plus close signals from the listen task.
#[instrument(skip(ws_tx, internal_rx))]
async fn write_session(
    user_id: i32,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<SessionSignal>,
) {
    while let Some(signal) = internal_rx.recv().await {
        match signal {
            SessionSignal::Deliver(frame) => {
                let json = match serde_json::to_string(frame.as_ref()) {
                    Ok(json) => json,
                    Err(err) => {
                        error!("failed to serialize outbound frame: {err}");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(Utf8Bytes::from(json))).await.is_err() {
                    // The peer is gone; the listen task will observe the
                    // stream ending and clean up.
                    warn!("failed to forward frame, stopping write task");
                    break;
                }
            }
            SessionSignal::Close(code, reason) => {
                let _ = ws_tx
                    .send(Message::Close(Some(CloseFrame {
                        code,
                        reason: Utf8Bytes::from(reason),
                    })))
                    .await;
                break;
            }
            SessionSignal::Shutdown => {
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }
        }
    }

    info!("write task terminated");
}

/// Reads inbound frames and processes them one at a time: the next frame
/// is not read until the previous persist-and-broadcast completed.
#[instrument(skip(user, ws_rx, internal_tx, rooms, state), fields(user_id = user.user_id))]
async fn listen_session(
    user: User,
    mut ws_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<SessionSignal>,
    conn_id: u64,
    rooms: Vec<RoomId>,
    state: Arc<AppState>,
) {
    let idle_timeout = Duration::from_secs(IDLE_TIMEOUT_SECONDS);

    loop {
        match timeout(idle_timeout, ws_rx.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                match process_frame(state.store.as_ref(), &state.registry, &user, &text).await {
                    Ok(_) => {}
                    Err(err) => {
                        warn!(code = err.close_code(), "closing connection: {}", err.reason());
                        let _ = internal_tx.send(SessionSignal::Close(err.close_code(), err.reason()));
                        break;
                    }
                }
            }
            Ok(Some(Ok(Message::Binary(_)))) => {
                // Only JSON text frames belong to the protocol
                warn!("binary frame received, closing connection");
                let _ = internal_tx.send(SessionSignal::Close(
                    CLOSE_POLICY_VIOLATION,
                    "binary frames are not supported",
                ));
                break;
            }
            Ok(Some(Ok(Message::Close(_)))) => {
                info!("close frame received");
                break;
            }
            Ok(Some(Ok(_))) => {} // ping/pong handled by the transport
            Ok(Some(Err(err))) => {
                warn!("WebSocket error: {err}");
                break;
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                info!(timeout_secs = IDLE_TIMEOUT_SECONDS, "connection idle timeout");
                break;
            }
        }
    }

    // Cleanup is idempotent: leaving a room twice is a no-op, and the
    // shutdown signal is ignored when the write task is already gone.
    for room in &rooms {
        state.registry.leave(*room, conn_id);
    }
    let _ = internal_tx.send(SessionSignal::Shutdown);
    info!("listen task terminated");
}
