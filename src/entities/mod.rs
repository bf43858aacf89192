//! Entities module - Domain entities
//!
//! This module contains the entities that represent data persisted in the
//! database, plus the room identifier used to address broadcast scopes.

pub mod channel;
pub mod direct_chat;
pub mod enums;
pub mod membership;
pub mod message;
pub mod room;
pub mod user;

// Re-exports to keep imports short
pub use channel::Channel;
pub use direct_chat::DirectChat;
pub use enums::{ChannelRole, LanguageCode, ProficiencyLevel};
pub use membership::Membership;
pub use message::StoredMessage;
pub use room::RoomId;
pub use user::User;
