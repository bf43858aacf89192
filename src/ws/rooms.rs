//! Room membership resolution
//!
//! Computes, at connect time, the full set of rooms a connection should
//! receive broadcasts for. Memberships created after the connection was
//! established are not pushed to it; the client reconnects to pick them
//! up (no join/leave side-channel exists).

use tracing::{debug, instrument};

use crate::entities::RoomId;
use crate::repositories::{ChatStore, StoreError};

/// The union of every channel room the user holds a membership record
/// for and every direct-chat room the user participates in.
#[instrument(skip(store))]
pub async fn resolve_rooms(
    store: &dyn ChatStore,
    user_id: i32,
) -> Result<Vec<RoomId>, StoreError> {
    let mut rooms: Vec<RoomId> = store
        .channel_ids_for_user(user_id)
        .await?
        .into_iter()
        .map(RoomId::Channel)
        .collect();

    rooms.extend(
        store
            .direct_chat_ids_for_user(user_id)
            .await?
            .into_iter()
            .map(RoomId::Direct),
    );

    debug!(count = rooms.len(), "rooms resolved for connection");
    Ok(rooms)
}
