//! Core module - Infrastructure components
//!
//! Configuration, JWT identity consumption and the shared application
//! state.

pub mod auth;
pub mod config;
pub mod state;

// Re-exports to keep imports short
pub use auth::{decode_jwt, encode_jwt, resolve_identity, Claims};
pub use config::Config;
pub use state::AppState;
