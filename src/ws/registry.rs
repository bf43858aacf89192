//! RoomRegistry - Room membership and fan-out
//!
//! Maps each room to the set of currently-connected sessions. Joining is
//! idempotent (keyed by connection id), leaving a room the connection
//! never joined is a no-op, and broadcast is best-effort per receiver: a
//! session that went away is pruned without affecting delivery to the
//! others. The sender of a message is an ordinary member and receives
//! its own broadcast.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, instrument, warn};

use crate::dtos::MessageFrameDTO;
use crate::entities::RoomId;

/// Signals delivered to a session's write task.
pub enum SessionSignal {
    /// A chat message frame to forward to the client.
    Deliver(Arc<MessageFrameDTO>),
    /// Close the socket with the given code and reason.
    Close(u16, &'static str),
    /// The session is over; send a normal close and stop.
    Shutdown,
}

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// The registry's view of one live connection: a process-unique id plus
/// the channel feeding its write task.
#[derive(Clone)]
pub struct ConnectionHandle {
    conn_id: u64,
    tx: UnboundedSender<SessionSignal>,
}

impl ConnectionHandle {
    pub fn new(tx: UnboundedSender<SessionSignal>) -> Self {
        Self {
            conn_id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            tx,
        }
    }

    pub fn conn_id(&self) -> u64 {
        self.conn_id
    }
}

pub struct RoomRegistry {
    rooms: DashMap<RoomId, HashMap<u64, UnboundedSender<SessionSignal>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        RoomRegistry {
            rooms: DashMap::new(),
        }
    }

    /// Register a connection as a recipient for a room. Idempotent:
    /// joining a room the connection is already in replaces its entry.
    #[instrument(skip(self, conn), fields(conn_id = conn.conn_id))]
    pub fn join(&self, room: RoomId, conn: &ConnectionHandle) {
        self.rooms
            .entry(room)
            .or_default()
            .insert(conn.conn_id, conn.tx.clone());
        debug!(%room, "connection joined room");
    }

    /// Deregister a connection from a room. A no-op when the connection
    /// never joined it.
    #[instrument(skip(self))]
    pub fn leave(&self, room: RoomId, conn_id: u64) {
        if let Some(mut members) = self.rooms.get_mut(&room) {
            members.remove(&conn_id);
            let emptied = members.is_empty();
            drop(members);
            if emptied {
                self.rooms.remove_if(&room, |_, members| members.is_empty());
            }
        }
    }

    /// Deliver a frame to every connection currently joined to the room,
    /// sender included. Returns the number of sessions reached; sessions
    /// whose channel is gone are pruned.
    #[instrument(skip(self, frame))]
    pub fn broadcast(&self, room: RoomId, frame: Arc<MessageFrameDTO>) -> usize {
        let Some(mut members) = self.rooms.get_mut(&room) else {
            debug!(%room, "broadcast to room with no connections");
            return 0;
        };

        let mut delivered = 0;
        members.retain(|conn_id, tx| {
            match tx.send(SessionSignal::Deliver(frame.clone())) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    warn!(conn_id, %room, "dropping closed connection from room");
                    false
                }
            }
        });

        debug!(%room, delivered, "frame broadcast");
        delivered
    }

    /// Number of connections currently joined to a room.
    pub fn room_size(&self, room: RoomId) -> usize {
        self.rooms.get(&room).map(|members| members.len()).unwrap_or(0)
    }

    /// Number of rooms with at least one connection.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
