//! DirectChat entity - A two-party chat between friends

/// A direct chat together with its participant user ids, as loaded from
/// the `direct_chats` and `direct_chat_users` tables.
#[derive(Debug, Clone)]
pub struct DirectChat {
    pub chat_id: i32,
    pub participants: Vec<i32>,
}

impl DirectChat {
    pub fn has_participant(&self, user_id: i32) -> bool {
        self.participants.contains(&user_id)
    }

    /// The participant on the other side of the chat from `user_id`, if
    /// there is one.
    pub fn peer_of(&self, user_id: i32) -> Option<i32> {
        self.participants.iter().copied().find(|&id| id != user_id)
    }
}
