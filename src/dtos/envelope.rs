//! Envelope DTOs - Inbound and outbound chat message frames

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{RoomId, StoredMessage};

/// Which kind of room an inbound message targets. `User` is the wire
/// name for a direct chat.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Channel,
    User,
}

/// Client-submitted payload. `chat_id` carries the bare id of the target
/// room; `chat_type` disambiguates the id space. Content is bounded by
/// the persisted message's column limit.
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct InboundMessageDTO {
    pub chat_id: String,
    pub chat_type: ChatKind,

    #[validate(length(min = 1, max = 2048, message = "Message content must be between 1 and 2048 characters"))]
    pub content: String,
}

impl InboundMessageDTO {
    /// The tagged room this envelope targets, or `None` when `chat_id`
    /// is not a valid id.
    pub fn room(&self) -> Option<RoomId> {
        let id = self.chat_id.parse::<i32>().ok()?;
        Some(match self.chat_type {
            ChatKind::Channel => RoomId::Channel(id),
            ChatKind::User => RoomId::Direct(id),
        })
    }
}

/// Author summary embedded in every outbound message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthorDTO {
    pub id: String,
    pub username: String,
}

/// The representation broadcast to every member of a room after the
/// message has been persisted. Derived deterministically from the
/// stored record; `chat_id` is the tagged room identifier.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutboundMessageDTO {
    pub id: String,
    pub chat_id: String,
    pub author: MessageAuthorDTO,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Wire frame wrapping an outbound message.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageFrameDTO {
    pub message: OutboundMessageDTO,
}

impl From<&StoredMessage> for OutboundMessageDTO {
    fn from(stored: &StoredMessage) -> Self {
        Self {
            id: stored.message_id.to_string(),
            chat_id: stored.room.to_string(),
            author: MessageAuthorDTO {
                id: stored.author_id.to_string(),
                username: stored.author_username.clone(),
            },
            content: stored.content.clone(),
            timestamp: stored.created_at,
        }
    }
}

impl From<&StoredMessage> for MessageFrameDTO {
    fn from(stored: &StoredMessage) -> Self {
        Self {
            message: OutboundMessageDTO::from(stored),
        }
    }
}
