//! Membership entity - The record authorizing a user to participate in a
//! channel's chat. Unique per (user, channel).

use serde::{Deserialize, Serialize};

use super::enums::ChannelRole;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Membership {
    pub user_id: i32,
    pub channel_id: i32,
    pub role: ChannelRole,
}
