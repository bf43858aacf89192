//! Inbound message processing
//!
//! One inbound frame moves through parse -> validate -> authorize ->
//! persist -> broadcast. Broadcast only ever happens after the store has
//! committed the message, and it uses the same room id the message was
//! persisted under. Every failure along the way is fatal for the
//! connection; nothing is silently dropped.

use std::sync::Arc;

use tokio::time::{timeout, Duration};
use tracing::{info, instrument};
use validator::Validate;

use super::authz;
use super::registry::RoomRegistry;
use super::{CLOSE_INTERNAL_ERROR, CLOSE_POLICY_VIOLATION, PERSIST_TIMEOUT_SECONDS};
use crate::dtos::{InboundMessageDTO, MessageFrameDTO};
use crate::entities::{RoomId, StoredMessage, User};
use crate::repositories::{ChatStore, StoreError};

/// Why an inbound frame was rejected. Every variant closes the
/// connection; `close_code` picks the code.
#[derive(Debug)]
pub enum GatewayError {
    /// The payload is not a valid envelope (bad JSON, missing fields,
    /// unrecognized kind, out-of-bounds content, unparsable id).
    Malformed(&'static str),
    /// The target channel or direct chat does not exist.
    TargetNotFound,
    /// The sender is not allowed to post to the target.
    Forbidden,
    /// The store failed while the message was being persisted.
    Store(StoreError),
    /// The store did not answer within the persistence deadline.
    PersistTimeout,
}

impl GatewayError {
    /// Close code sent to the client. Validation and authorization
    /// failures are policy violations; store trouble is an internal
    /// error.
    pub fn close_code(&self) -> u16 {
        match self {
            GatewayError::Malformed(_)
            | GatewayError::TargetNotFound
            | GatewayError::Forbidden
            | GatewayError::Store(StoreError::NotFound)
            | GatewayError::Store(StoreError::Constraint(_)) => CLOSE_POLICY_VIOLATION,
            GatewayError::Store(_) | GatewayError::PersistTimeout => CLOSE_INTERNAL_ERROR,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            GatewayError::Malformed(reason) => reason,
            GatewayError::TargetNotFound => "chat target not found",
            GatewayError::Forbidden => "not allowed to post to this chat",
            GatewayError::Store(StoreError::NotFound) => "chat target not found",
            GatewayError::Store(StoreError::Constraint(reason)) => reason,
            GatewayError::Store(_) => "message could not be persisted",
            GatewayError::PersistTimeout => "message persistence timed out",
        }
    }
}

/// Handle one inbound text frame from an authenticated connection.
/// Returns the number of sessions the resulting broadcast reached.
#[instrument(skip(store, registry, author, text), fields(user_id = author.user_id))]
pub async fn process_frame(
    store: &dyn ChatStore,
    registry: &RoomRegistry,
    author: &User,
    text: &str,
) -> Result<usize, GatewayError> {
    let inbound: InboundMessageDTO = serde_json::from_str(text)
        .map_err(|_| GatewayError::Malformed("malformed message envelope"))?;

    inbound
        .validate()
        .map_err(|_| GatewayError::Malformed("message content out of bounds"))?;

    let room = inbound
        .room()
        .ok_or(GatewayError::Malformed("chat_id is not a valid id"))?;

    authz::check_can_post(store, author.user_id, room).await?;

    // The write is the durability boundary: once it commits, the message
    // exists even if this connection goes away before seeing the
    // broadcast. A store that never answers must not wedge the session
    // forever.
    let stored = timeout(
        Duration::from_secs(PERSIST_TIMEOUT_SECONDS),
        persist(store, author, room, &inbound.content),
    )
    .await
    .map_err(|_| GatewayError::PersistTimeout)??;

    let frame = Arc::new(MessageFrameDTO::from(&stored));
    let delivered = registry.broadcast(stored.room, frame);
    info!(message_id = stored.message_id, room = %stored.room, delivered, "message fanned out");

    Ok(delivered)
}

async fn persist(
    store: &dyn ChatStore,
    author: &User,
    room: RoomId,
    content: &str,
) -> Result<StoredMessage, GatewayError> {
    match room {
        RoomId::Channel(channel_id) => store
            .create_channel_message(author, channel_id, content)
            .await
            .map_err(GatewayError::Store),
        RoomId::Direct(chat_id) => store
            .create_direct_message(author, chat_id, content)
            .await
            .map_err(GatewayError::Store),
    }
}
