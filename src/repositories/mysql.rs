//! MySqlStore - MySQL-backed persistence store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};

use super::traits::{ChatStore, StoreError};
use crate::entities::{Channel, DirectChat, Membership, RoomId, StoredMessage, User};

pub struct MySqlStore {
    connection_pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    /// Participant ids of a direct chat, in no particular order.
    async fn direct_chat_participants(&self, chat_id: i32) -> Result<Vec<i32>, StoreError> {
        let participants = sqlx::query_scalar::<_, i32>(
            "SELECT user_id FROM direct_chat_users WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(participants)
    }
}

#[async_trait]
impl ChatStore for MySqlStore {
    #[instrument(skip(self))]
    async fn find_user(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, username FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn channel_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, StoreError> {
        let channel_ids = sqlx::query_scalar::<_, i32>(
            "SELECT channel_id FROM memberships WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!(count = channel_ids.len(), "channel memberships loaded");
        Ok(channel_ids)
    }

    #[instrument(skip(self))]
    async fn direct_chat_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, StoreError> {
        let chat_ids = sqlx::query_scalar::<_, i32>(
            "SELECT chat_id FROM direct_chat_users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!(count = chat_ids.len(), "direct chat participations loaded");
        Ok(chat_ids)
    }

    #[instrument(skip(self))]
    async fn find_channel(&self, channel_id: i32) -> Result<Option<Channel>, StoreError> {
        let channel = sqlx::query_as::<_, Channel>(
            "SELECT channel_id, name, description, language, level \
             FROM channels WHERE channel_id = ?",
        )
        .bind(channel_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(channel)
    }

    #[instrument(skip(self))]
    async fn find_direct_chat(&self, chat_id: i32) -> Result<Option<DirectChat>, StoreError> {
        let exists = sqlx::query_scalar::<_, i32>(
            "SELECT chat_id FROM direct_chats WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        let Some(chat_id) = exists else {
            return Ok(None);
        };

        let participants = self.direct_chat_participants(chat_id).await?;
        Ok(Some(DirectChat { chat_id, participants }))
    }

    #[instrument(skip(self))]
    async fn find_membership(
        &self,
        user_id: i32,
        channel_id: i32,
    ) -> Result<Option<Membership>, StoreError> {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT user_id, channel_id, role \
             FROM memberships WHERE user_id = ? AND channel_id = ?",
        )
        .bind(user_id)
        .bind(channel_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(membership)
    }

    #[instrument(skip(self, author, content), fields(author_id = author.user_id))]
    async fn create_channel_message(
        &self,
        author: &User,
        channel_id: i32,
        content: &str,
    ) -> Result<StoredMessage, StoreError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO channel_messages (channel_id, author_id, content, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(channel_id)
        .bind(author.user_id)
        .bind(content)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        let message_id = result.last_insert_id() as i32;
        info!(message_id, channel_id, "channel message persisted");

        Ok(StoredMessage {
            message_id,
            room: RoomId::Channel(channel_id),
            author_id: author.user_id,
            author_username: author.username.clone(),
            content: content.to_string(),
            created_at,
        })
    }

    #[instrument(skip(self, author, content), fields(author_id = author.user_id))]
    async fn create_direct_message(
        &self,
        author: &User,
        chat_id: i32,
        content: &str,
    ) -> Result<StoredMessage, StoreError> {
        let chat = self
            .find_direct_chat(chat_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        // The database CHECK constraint backs this up, but failing here
        // keeps the error distinguishable.
        let recipient_id = chat
            .peer_of(author.user_id)
            .ok_or(StoreError::Constraint("direct message author equals recipient"))?;

        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO direct_messages (chat_id, author_id, recipient_id, content, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(chat_id)
        .bind(author.user_id)
        .bind(recipient_id)
        .bind(content)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        let message_id = result.last_insert_id() as i32;
        info!(message_id, chat_id, recipient_id, "direct message persisted");

        Ok(StoredMessage {
            message_id,
            room: RoomId::Direct(chat_id),
            author_id: author.user_id,
            author_username: author.username.clone(),
            content: content.to_string(),
            created_at,
        })
    }
}
