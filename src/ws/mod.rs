//! WebSocket module - Real-time chat fan-out
//!
//! The per-connection protocol:
//! - on upgrade the connection is authenticated from its token, its
//!   rooms are resolved once, and it joins the registry for each;
//! - inbound messages are validated, authorized, persisted and only then
//!   broadcast to the room's connections;
//! - any validation or authorization failure closes the connection with
//!   the policy-violation code;
//! - on disconnect the connection leaves every room it joined.

pub mod authz;
pub mod gateway;
pub mod registry;
pub mod rooms;
pub mod session;

// Re-exports to keep imports short
pub use gateway::{process_frame, GatewayError};
pub use registry::{ConnectionHandle, RoomRegistry, SessionSignal};
pub use session::handle_socket;

use std::sync::Arc;

use axum::extract::{Query, State, ws::WebSocketUpgrade};
use axum::response::Response;
use serde::Deserialize;

use crate::core::{auth, AppState};

/// Application close code for policy violations: unauthenticated connect
/// attempts and any post-connect validation/authorization failure.
pub const CLOSE_POLICY_VIOLATION: u16 = 4003;

/// Close code for failures on our side (store unavailable, persistence
/// timeout).
pub const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// Upper bound on one persistence call; a store that never answers must
/// not leave the session blocked forever.
pub const PERSIST_TIMEOUT_SECONDS: u64 = 10;

/// Idle-read timeout after which a silent connection is dropped.
pub const IDLE_TIMEOUT_SECONDS: u64 = 600;

#[derive(Deserialize)]
pub struct WsAuthQuery {
    /// JWT issued by the account service, passed as a query parameter
    /// since browsers cannot set headers on WebSocket upgrades.
    pub token: Option<String>,
}

/// Entry point for WebSocket upgrade requests.
///
/// The identity is resolved before the upgrade, but an absent or invalid
/// token still accepts the socket and immediately closes it with the
/// policy-violation code, so clients observe a proper close frame rather
/// than a failed handshake.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(params): Query<WsAuthQuery>,
) -> Response {
    let identity = auth::resolve_identity(params.token.as_deref(), &state.jwt_secret);
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity))
}
