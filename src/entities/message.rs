//! StoredMessage - A persisted chat message
//!
//! The durable rows live in `channel_messages` / `direct_messages`; the
//! store hands the gateway this flattened copy for broadcast. The store
//! owns the record, the gateway only forwards it.

use chrono::{DateTime, Utc};

use super::room::RoomId;

#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub message_id: i32,
    /// The room the message was persisted under; broadcast uses the
    /// same id.
    pub room: RoomId,
    pub author_id: i32,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
