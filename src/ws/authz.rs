//! Posting authorization
//!
//! A standalone allow/deny check, decoupled from the persistence types:
//! the gateway calls this before ever touching the message tables.

use tracing::{instrument, warn};

use super::gateway::GatewayError;
use crate::entities::RoomId;
use crate::repositories::ChatStore;

/// Check that `user_id` may post to `room`.
///
/// For a channel the sender must hold a membership record; for a direct
/// chat the sender must be one of its participants. A target that does
/// not exist is reported as [`GatewayError::TargetNotFound`] so the
/// caller can distinguish it from a denial.
#[instrument(skip(store))]
pub async fn check_can_post(
    store: &dyn ChatStore,
    user_id: i32,
    room: RoomId,
) -> Result<(), GatewayError> {
    match room {
        RoomId::Channel(channel_id) => {
            store
                .find_channel(channel_id)
                .await
                .map_err(GatewayError::Store)?
                .ok_or(GatewayError::TargetNotFound)?;

            match store
                .find_membership(user_id, channel_id)
                .await
                .map_err(GatewayError::Store)?
            {
                Some(_) => Ok(()),
                None => {
                    warn!(user_id, channel_id, "post to channel without membership");
                    Err(GatewayError::Forbidden)
                }
            }
        }
        RoomId::Direct(chat_id) => {
            let chat = store
                .find_direct_chat(chat_id)
                .await
                .map_err(GatewayError::Store)?
                .ok_or(GatewayError::TargetNotFound)?;

            if chat.has_participant(user_id) {
                Ok(())
            } else {
                warn!(user_id, chat_id, "post to direct chat by a non-participant");
                Err(GatewayError::Forbidden)
            }
        }
    }
}
