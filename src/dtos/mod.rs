//! DTOs module - Data Transfer Objects
//!
//! Wire representations exchanged with WebSocket clients. DTOs keep the
//! external shape separate from the internal entities.

pub mod envelope;

// Re-exports to keep imports short
pub use envelope::{ChatKind, InboundMessageDTO, MessageAuthorDTO, MessageFrameDTO, OutboundMessageDTO};
