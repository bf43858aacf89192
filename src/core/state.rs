//! Application state shared across routes and connections

use std::sync::Arc;

use sqlx::MySqlPool;

use crate::repositories::{ChatStore, MySqlStore};
use crate::ws::registry::RoomRegistry;

/// Shared state handed to every route and WebSocket session.
///
/// The store is held behind the [`ChatStore`] trait so the gateway can be
/// exercised against an in-memory implementation in tests.
pub struct AppState {
    pub store: Arc<dyn ChatStore>,
    pub registry: RoomRegistry,
    pub jwt_secret: String,
}

impl AppState {
    /// Production state backed by a MySQL pool.
    pub fn new(pool: MySqlPool, jwt_secret: String) -> Self {
        Self::with_store(Arc::new(MySqlStore::new(pool)), jwt_secret)
    }

    /// State over an arbitrary store implementation.
    pub fn with_store(store: Arc<dyn ChatStore>, jwt_secret: String) -> Self {
        Self {
            store,
            registry: RoomRegistry::new(),
            jwt_secret,
        }
    }
}
