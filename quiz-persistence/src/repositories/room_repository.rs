use std::time::Duration;

use chrono::Utc;
use quiz_types::{GameState, Player, Room, RoomError, new_guest_id};
use tracing::info;

use crate::SharedStore;
use crate::snapshot::Snapshot;

/// Most-recent-first room code history, capped at this many entries.
pub const MAX_RECENT_ROOMS: usize = 5;

/// Entity CRUD for rooms and their embedded players. Every mutation
/// re-reads the room under the write lock and persists before
/// returning, so callers never clobber a concurrent change.
#[derive(Clone)]
pub struct RoomRegistry {
    store: SharedStore,
}

impl RoomRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Create a room under `code` with a single host player. The caller
    /// owns code generation and must re-roll on `CodeTaken`.
    pub async fn create_room(
        &self,
        code: &str,
        host_name: &str,
        host_id: Option<String>,
        content_id: Option<String>,
        time_limit: u32,
    ) -> Result<Room, RoomError> {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        if snapshot.rooms.iter().any(|r| r.code == code) {
            return Err(RoomError::CodeTaken {
                code: code.to_string(),
            });
        }

        let now = Utc::now().timestamp_millis();
        let room = Room::new(code, host_name, host_id, content_id, time_limit, now);
        snapshot.rooms.push(room.clone());
        push_recent(snapshot, code);
        store.persist();
        info!("created room {code} hosted by {host_name}");
        Ok(room)
    }

    pub async fn find_room_by_code(&self, code: &str) -> Option<Room> {
        let store = self.store.read().await;
        store.snapshot().rooms.iter().find(|r| r.code == code).cloned()
    }

    /// Read-merge-write: fetch the live room, apply `mutate`, refresh
    /// `last_activity`, persist. Returns the updated room.
    pub async fn update_room<F>(&self, code: &str, mutate: F) -> Result<Room, RoomError>
    where
        F: FnOnce(&mut Room),
    {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let room = snapshot
            .rooms
            .iter_mut()
            .find(|r| r.code == code)
            .ok_or_else(|| RoomError::NotFound {
                code: code.to_string(),
            })?;
        mutate(room);
        room.last_activity = Utc::now().timestamp_millis();
        let updated = room.clone();
        store.persist();
        Ok(updated)
    }

    /// Append a player; rejects a full or missing room. Joining also
    /// records the code in the recent-rooms history.
    pub async fn add_player_to_room(
        &self,
        code: &str,
        name: &str,
        player_id: Option<String>,
    ) -> Result<Player, RoomError> {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let room = snapshot
            .rooms
            .iter_mut()
            .find(|r| r.code == code)
            .ok_or_else(|| RoomError::NotFound {
                code: code.to_string(),
            })?;
        if room.is_full() {
            return Err(RoomError::Full {
                code: code.to_string(),
            });
        }

        let id = player_id.unwrap_or_else(new_guest_id);
        let player = Player::new(id, name, false);
        room.players.push(player.clone());
        room.last_activity = Utc::now().timestamp_millis();
        push_recent(snapshot, code);
        store.persist();
        info!("{name} joined room {code}");
        Ok(player)
    }

    /// Remove a player by id. The last player leaving deletes the room;
    /// a departing host hands the room to the earliest remaining player.
    pub async fn remove_player_from_room(&self, code: &str, player_id: &str) {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let Some(room) = snapshot.rooms.iter_mut().find(|r| r.code == code) else {
            return;
        };

        let before = room.players.len();
        room.players.retain(|p| p.id != player_id);
        if room.players.len() == before {
            return;
        }

        if room.players.is_empty() {
            snapshot.rooms.retain(|r| r.code != code);
            info!("removed empty room {code}");
        } else {
            if !room.players.iter().any(|p| p.is_host) {
                let next_host = &mut room.players[0];
                next_host.is_host = true;
                room.host_id = Some(next_host.id.clone());
                room.host_name = next_host.name.clone();
                info!("promoted {} to host of room {code}", next_host.name);
            }
            room.last_activity = Utc::now().timestamp_millis();
        }
        store.persist();
    }

    pub async fn delete_room(&self, code: &str) -> bool {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let before = snapshot.rooms.len();
        snapshot.rooms.retain(|r| r.code != code);
        let deleted = snapshot.rooms.len() != before;
        if deleted {
            store.persist();
            info!("deleted room {code}");
        }
        deleted
    }

    /// Drop every room idle for longer than `max_age`. Run once at
    /// process start; returns how many rooms were swept.
    pub async fn cleanup_stale_rooms(&self, max_age: Duration) -> usize {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let cutoff = Utc::now().timestamp_millis() - max_age.as_millis() as i64;
        let before = snapshot.rooms.len();
        snapshot.rooms.retain(|r| r.last_activity >= cutoff);
        let removed = before - snapshot.rooms.len();
        if removed > 0 {
            store.persist();
            info!("cleaned up {removed} stale rooms");
        }
        removed
    }

    /// Recently visited rooms that still exist, most recent first.
    pub async fn recent_rooms(&self) -> Vec<Room> {
        let store = self.store.read().await;
        let snapshot = store.snapshot();
        snapshot
            .recent_rooms
            .iter()
            .filter_map(|code| snapshot.rooms.iter().find(|r| &r.code == code))
            .take(MAX_RECENT_ROOMS)
            .cloned()
            .collect()
    }

    /// Rooms a newcomer could join right now.
    pub async fn waiting_rooms(&self) -> Vec<Room> {
        let store = self.store.read().await;
        store
            .snapshot()
            .rooms
            .iter()
            .filter(|r| r.game_state == GameState::Waiting && !r.is_full())
            .cloned()
            .collect()
    }
}

fn push_recent(snapshot: &mut Snapshot, code: &str) {
    snapshot.recent_rooms.retain(|c| c != code);
    snapshot.recent_rooms.insert(0, code.to_string());
    snapshot.recent_rooms.truncate(MAX_RECENT_ROOMS);
}
