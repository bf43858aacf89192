//! Shared test fixtures
//!
//! Provides an in-memory `ChatStore` so the gateway can be exercised
//! without a MySQL instance, plus helpers to build application state and
//! serve the router on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use tandem_server::core::auth::encode_jwt;
use tandem_server::entities::{
    Channel, ChannelRole, DirectChat, LanguageCode, Membership, ProficiencyLevel, RoomId,
    StoredMessage, User,
};
use tandem_server::repositories::{ChatStore, StoreError};
use tandem_server::{create_router, AppState};

pub const TEST_JWT_SECRET: &str = "test-only-secret";

/// In-memory store mirroring the MySQL-backed implementation closely
/// enough to drive the gateway: same not-found and constraint behavior,
/// plus switches and counters the production store does not need.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<i32, User>>,
    channels: Mutex<HashMap<i32, Channel>>,
    memberships: Mutex<HashMap<(i32, i32), ChannelRole>>,
    direct_chats: Mutex<HashMap<i32, Vec<i32>>>,
    messages: Mutex<Vec<StoredMessage>>,
    direct_recipients: Mutex<Vec<i32>>,
    next_message_id: AtomicI32,
    create_calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI32::new(1),
            ..Self::default()
        }
    }

    pub fn user(self, user_id: i32, username: &str) -> Self {
        self.users.lock().unwrap().insert(
            user_id,
            User {
                user_id,
                username: username.to_string(),
            },
        );
        self
    }

    pub fn channel(self, channel_id: i32, name: &str) -> Self {
        self.channels.lock().unwrap().insert(
            channel_id,
            Channel {
                channel_id,
                name: name.to_string(),
                description: String::new(),
                language: LanguageCode::Es,
                level: ProficiencyLevel::B1,
            },
        );
        self
    }

    pub fn member(self, user_id: i32, channel_id: i32) -> Self {
        self.memberships
            .lock()
            .unwrap()
            .insert((user_id, channel_id), ChannelRole::User);
        self
    }

    pub fn direct_chat(self, chat_id: i32, participants: &[i32]) -> Self {
        self.direct_chats
            .lock()
            .unwrap()
            .insert(chat_id, participants.to_vec());
        self
    }

    /// Make every message write fail, simulating a store outage.
    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn last_message(&self) -> Option<StoredMessage> {
        self.messages.lock().unwrap().last().cloned()
    }

    /// How many times a message write was attempted, successful or not.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn last_direct_recipient(&self) -> Option<i32> {
        self.direct_recipients.lock().unwrap().last().copied()
    }

    fn store_message(&self, message: StoredMessage) -> StoredMessage {
        self.messages.lock().unwrap().push(message.clone());
        message
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("simulated store outage"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn find_user(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }

    async fn channel_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, StoreError> {
        let mut ids: Vec<i32> = self
            .memberships
            .lock()
            .unwrap()
            .keys()
            .filter(|(member_id, _)| *member_id == user_id)
            .map(|(_, channel_id)| *channel_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn direct_chat_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, StoreError> {
        let mut ids: Vec<i32> = self
            .direct_chats
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, participants)| participants.contains(&user_id))
            .map(|(chat_id, _)| *chat_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn find_channel(&self, channel_id: i32) -> Result<Option<Channel>, StoreError> {
        Ok(self.channels.lock().unwrap().get(&channel_id).cloned())
    }

    async fn find_direct_chat(&self, chat_id: i32) -> Result<Option<DirectChat>, StoreError> {
        Ok(self
            .direct_chats
            .lock()
            .unwrap()
            .get(&chat_id)
            .map(|participants| DirectChat {
                chat_id,
                participants: participants.clone(),
            }))
    }

    async fn find_membership(
        &self,
        user_id: i32,
        channel_id: i32,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .get(&(user_id, channel_id))
            .map(|role| Membership {
                user_id,
                channel_id,
                role: *role,
            }))
    }

    async fn create_channel_message(
        &self,
        author: &User,
        channel_id: i32,
        content: &str,
    ) -> Result<StoredMessage, StoreError> {
        self.begin_write()?;
        if !self.channels.lock().unwrap().contains_key(&channel_id) {
            return Err(StoreError::NotFound);
        }

        Ok(self.store_message(StoredMessage {
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            room: RoomId::Channel(channel_id),
            author_id: author.user_id,
            author_username: author.username.clone(),
            content: content.to_string(),
            created_at: Utc::now(),
        }))
    }

    async fn create_direct_message(
        &self,
        author: &User,
        chat_id: i32,
        content: &str,
    ) -> Result<StoredMessage, StoreError> {
        self.begin_write()?;
        let chat = self
            .find_direct_chat(chat_id)
            .await?
            .ok_or(StoreError::NotFound)?;

        let recipient_id = chat
            .peer_of(author.user_id)
            .ok_or(StoreError::Constraint("direct message author equals recipient"))?;
        self.direct_recipients.lock().unwrap().push(recipient_id);

        Ok(self.store_message(StoredMessage {
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst),
            room: RoomId::Direct(chat_id),
            author_id: author.user_id,
            author_username: author.username.clone(),
            content: content.to_string(),
            created_at: Utc::now(),
        }))
    }
}

/// Application state over an in-memory store.
pub fn test_state(store: Arc<MemoryStore>) -> Arc<AppState> {
    Arc::new(AppState::with_store(store, TEST_JWT_SECRET.to_string()))
}

/// A token the gateway will accept for the given user.
pub fn token_for(user_id: i32, username: &str) -> String {
    encode_jwt(username, user_id, TEST_JWT_SECRET).expect("failed to encode test token")
}

/// Serve the router on an ephemeral port and return its address.
pub async fn serve(state: Arc<AppState>) -> SocketAddr {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });
    addr
}
