//! Persistence store contract
//!
//! The database is the single source of truth for messages; the gateway
//! only ever holds transient copies. All methods are fallible and
//! distinguish "the target does not exist" from availability errors, so
//! callers can map them to the right protocol outcome.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;

use crate::entities::{Channel, DirectChat, Membership, StoredMessage, User};

#[derive(Debug)]
pub enum StoreError {
    /// The referenced row does not exist.
    NotFound,
    /// A data invariant rejected the write (e.g. a direct message whose
    /// author would equal its recipient).
    Constraint(&'static str),
    /// The store cannot currently serve requests.
    Unavailable(&'static str),
    /// Any other database error.
    Database(sqlx::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "row not found"),
            StoreError::Constraint(msg) => write!(f, "constraint violated: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::Database(err) => write!(f, "database error: {err}"),
        }
    }
}

impl Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable("connection pool exhausted")
            }
            other => StoreError::Database(other),
        }
    }
}

/// Durable storage for users, channels, memberships, direct chats and
/// chat messages, as consumed by the WebSocket gateway.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Resolve a user id to an account.
    async fn find_user(&self, user_id: i32) -> Result<Option<User>, StoreError>;

    /// Ids of every channel the user holds a membership record for.
    async fn channel_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, StoreError>;

    /// Ids of every direct chat the user participates in.
    async fn direct_chat_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, StoreError>;

    async fn find_channel(&self, channel_id: i32) -> Result<Option<Channel>, StoreError>;

    async fn find_direct_chat(&self, chat_id: i32) -> Result<Option<DirectChat>, StoreError>;

    /// The membership record tying `user_id` to `channel_id`, if any.
    async fn find_membership(
        &self,
        user_id: i32,
        channel_id: i32,
    ) -> Result<Option<Membership>, StoreError>;

    /// Persist a channel message. Fails with [`StoreError::NotFound`]
    /// when the channel does not exist. The timestamp is assigned here,
    /// at persistence time.
    async fn create_channel_message(
        &self,
        author: &User,
        channel_id: i32,
        content: &str,
    ) -> Result<StoredMessage, StoreError>;

    /// Persist a direct message. The recipient is derived from the
    /// chat's other participant; a chat that would make the author its
    /// own recipient is rejected with [`StoreError::Constraint`].
    async fn create_direct_message(
        &self,
        author: &User,
        chat_id: i32,
        content: &str,
    ) -> Result<StoredMessage, StoreError>;
}
