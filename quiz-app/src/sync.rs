use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::info;

use quiz_core::ScoringEngine;
use quiz_persistence::RoomRegistry;
use quiz_types::{GameState, PlayerStatus, Room, RoomListing, RoomUpdate};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Polling stand-in for a push channel. One SyncLoop belongs to one
/// view and owns at most one timer: starting any poll cancels the
/// previous one, and dropping the loop cancels whatever is running.
/// Loops of other views are independent and never affected.
pub struct SyncLoop {
    rooms: RoomRegistry,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl SyncLoop {
    pub fn new(rooms: RoomRegistry) -> Self {
        Self::with_interval(rooms, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(rooms: RoomRegistry, interval: Duration) -> Self {
        Self {
            rooms,
            interval,
            handle: None,
        }
    }

    /// Re-fetch one room on a fixed cadence and publish what the view
    /// needs. The first publish happens immediately. When the room
    /// disappears the loop sends `RoomGone` exactly once and stops
    /// itself.
    pub fn start_room_updates(&mut self, room_code: &str, sink: UnboundedSender<RoomUpdate>) {
        self.stop_updates();

        let rooms = self.rooms.clone();
        let code = room_code.to_string();
        let period = self.interval;
        info!("started polling room {code}");

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match rooms.find_room_by_code(&code).await {
                    None => {
                        info!("room {code} is gone, stopping updates");
                        let _ = sink.send(RoomUpdate::RoomGone { code: code.clone() });
                        break;
                    }
                    Some(room) => {
                        let now = Utc::now().timestamp_millis();
                        if sink.send(room_update(&room, now)).is_err() {
                            // the view hung up
                            break;
                        }
                    }
                }
            }
        }));
    }

    /// Same cadence, but publishes the joinable-rooms list for the
    /// room-list screen.
    pub fn start_room_list_updates(&mut self, sink: UnboundedSender<RoomUpdate>) {
        self.stop_updates();

        let rooms = self.rooms.clone();
        let period = self.interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let listing = rooms
                    .waiting_rooms()
                    .await
                    .iter()
                    .map(RoomListing::from)
                    .collect();
                if sink.send(RoomUpdate::RoomList { rooms: listing }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Cancel the active poll, if any. Safe to call repeatedly.
    pub fn stop_updates(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        self.stop_updates();
    }
}

/// Project a room onto the message its view needs. The countdown is
/// recomputed from the stamped start time on every tick with the same
/// function the engine scores with, so display and scoring agree.
fn room_update(room: &Room, now: i64) -> RoomUpdate {
    match room.game_state {
        GameState::Waiting => RoomUpdate::Lobby {
            code: room.code.clone(),
            players: room.players.clone(),
            player_count: room.players.len(),
            max_players: room.max_players,
            can_start: room.players.len() >= quiz_core::MIN_PLAYERS,
        },
        GameState::Playing => RoomUpdate::InGame {
            code: room.code.clone(),
            question_index: room.current_question_index,
            seconds_remaining: ScoringEngine::room_seconds_remaining(room, now),
            players: room.players.iter().map(PlayerStatus::from).collect(),
        },
        GameState::Finished => RoomUpdate::Finished {
            code: room.code.clone(),
            results: room
                .results
                .clone()
                .unwrap_or_else(|| room.players.clone()),
        },
    }
}
