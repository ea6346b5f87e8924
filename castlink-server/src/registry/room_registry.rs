use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use castlink_core::{ConnectionId, Resolution, RoomKey};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::registry::Room;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("room not found")]
    RoomNotFound,
}

/// Everything the signaling layer must deliver after a connection went away.
/// Produced atomically so notification happens outside the registry lock.
#[derive(Debug, Default)]
pub struct DisconnectCleanup {
    /// Rooms destroyed because the departed connection hosted them, with the
    /// members still around to receive `host-disconnected`.
    pub closed_rooms: Vec<(RoomKey, Vec<ConnectionId>)>,
    /// Hosts to receive `viewer-disconnected`, one entry per room the
    /// departed connection was viewing.
    pub hosts_to_notify: Vec<ConnectionId>,
}

/// Which rooms a connection currently belongs to. Kept in lockstep with the
/// room table so disconnect cleanup touches only the rooms involved instead
/// of scanning the whole table.
#[derive(Debug, Default)]
struct Membership {
    hosting: HashSet<RoomKey>,
    viewing: HashSet<RoomKey>,
}

impl Membership {
    fn is_empty(&self) -> bool {
        self.hosting.is_empty() && self.viewing.is_empty()
    }
}

#[derive(Default)]
struct RegistryInner {
    rooms: HashMap<RoomKey, Room>,
    memberships: HashMap<ConnectionId, Membership>,
}

/// Sole owner of the room table and its reverse index. Every operation runs
/// under one lock, so read-then-act sequences (join vs. a concurrent host
/// disconnect) cannot interleave.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `host` as the owner of `key`. An existing room under the
    /// same key is discarded without any notification to its members.
    pub async fn create_or_replace(&self, key: RoomKey, host: ConnectionId) {
        let mut inner = self.inner.write().await;

        if let Some(old) = inner.rooms.remove(&key) {
            info!(room = %key, old_host = %old.host, "Room key reused, discarding previous room");
            detach_room(&mut inner.memberships, &key, &old);
        }

        inner.rooms.insert(key.clone(), Room::new(host));
        inner
            .memberships
            .entry(host)
            .or_default()
            .hosting
            .insert(key);
    }

    /// Attach `viewer` to the room under `key`. Returns the host's identity
    /// so the caller can notify it. Duplicate joins append again.
    pub async fn try_join(
        &self,
        key: &RoomKey,
        viewer: ConnectionId,
    ) -> Result<ConnectionId, JoinError> {
        let mut inner = self.inner.write().await;

        let Some(room) = inner.rooms.get_mut(key) else {
            return Err(JoinError::RoomNotFound);
        };

        room.viewers.push(viewer);
        let host = room.host;
        inner
            .memberships
            .entry(viewer)
            .or_default()
            .viewing
            .insert(key.clone());

        Ok(host)
    }

    /// Store the room's resolution and return the members to fan it out to
    /// (everyone except `sender`, deduplicated). `None` if the room does not
    /// exist; the update is then dropped without a trace.
    pub async fn update_resolution(
        &self,
        key: &RoomKey,
        resolution: Resolution,
        sender: ConnectionId,
    ) -> Option<Vec<ConnectionId>> {
        let mut inner = self.inner.write().await;

        let room = inner.rooms.get_mut(key)?;
        room.resolution = Some(resolution);

        Some(recipients_except(room, sender))
    }

    /// Drop every trace of `conn`: destroy the rooms it hosted and detach it
    /// from the rooms it viewed. O(memberships of `conn`), not O(rooms).
    pub async fn remove_connection(&self, conn: ConnectionId) -> DisconnectCleanup {
        let mut inner = self.inner.write().await;
        let mut cleanup = DisconnectCleanup::default();

        let Some(membership) = inner.memberships.remove(&conn) else {
            return cleanup;
        };

        for key in &membership.hosting {
            let Some(room) = inner.rooms.remove(key) else {
                continue;
            };
            let recipients = recipients_except(&room, conn);
            detach_room(&mut inner.memberships, key, &room);
            cleanup.closed_rooms.push((key.clone(), recipients));
        }

        for key in &membership.viewing {
            // Hosted rooms were already destroyed above.
            if membership.hosting.contains(key) {
                continue;
            }
            let Some(room) = inner.rooms.get_mut(key) else {
                continue;
            };
            room.viewers.retain(|v| *v != conn);
            cleanup.hosts_to_notify.push(room.host);
        }

        cleanup
    }

    pub async fn contains_room(&self, key: &RoomKey) -> bool {
        self.inner.read().await.rooms.contains_key(key)
    }

    pub async fn room_count(&self) -> usize {
        self.inner.read().await.rooms.len()
    }

    pub async fn viewers_of(&self, key: &RoomKey) -> Option<Vec<ConnectionId>> {
        let inner = self.inner.read().await;
        inner.rooms.get(key).map(|room| room.viewers.clone())
    }

    pub async fn resolution_of(&self, key: &RoomKey) -> Option<Resolution> {
        let inner = self.inner.read().await;
        inner.rooms.get(key).and_then(|room| room.resolution)
    }
}

/// Members of `room` minus `sender`, each listed once even if they joined
/// the room more than once.
fn recipients_except(room: &Room, sender: ConnectionId) -> Vec<ConnectionId> {
    let mut seen = HashSet::new();
    room.members()
        .filter(|m| *m != sender && seen.insert(*m))
        .collect()
}

/// Remove every member's reverse-index entry for a room that no longer
/// exists, dropping memberships that become empty.
fn detach_room(memberships: &mut HashMap<ConnectionId, Membership>, key: &RoomKey, room: &Room) {
    let mut forget = |conn: ConnectionId, hosting: bool| {
        if let Some(membership) = memberships.get_mut(&conn) {
            if hosting {
                membership.hosting.remove(key);
            } else {
                membership.viewing.remove(key);
            }
            if membership.is_empty() {
                memberships.remove(&conn);
            }
        }
    };

    forget(room.host, true);
    for viewer in &room.viewers {
        forget(*viewer, false);
    }
}
