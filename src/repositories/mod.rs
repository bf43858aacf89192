//! Repositories module - Persistence layer
//!
//! The gateway never talks to the database directly: it is handed a
//! [`ChatStore`] at construction, so its behavior is testable with an
//! in-memory store. [`MySqlStore`] is the production implementation.

pub mod mysql;
pub mod traits;

// Re-exports to keep imports short
pub use mysql::MySqlStore;
pub use traits::{ChatStore, StoreError};
