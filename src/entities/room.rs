//! Room identifier - Tagged address of a broadcast scope
//!
//! Channel chats and direct chats draw their ids from two unrelated
//! auto-increment sequences, so a bare numeric id is ambiguous: channel 7
//! and direct chat 7 can both exist. The tag keeps the two id spaces
//! disjoint by construction, in the registry keys and on the wire.

use std::fmt;

/// A logical broadcast scope: either a channel chat or a two-party
/// direct chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomId {
    Channel(i32),
    Direct(i32),
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomId::Channel(id) => write!(f, "channel:{id}"),
            RoomId::Direct(id) => write!(f, "direct:{id}"),
        }
    }
}
