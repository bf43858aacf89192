//! User entity

use serde::{Deserialize, Serialize};

/// An account. Credentials and profile data live behind the account
/// service; the chat subsystem only needs the identity and display name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
}
