use serde::{Deserialize, Serialize};

use crate::room::{Player, Room};

/// Per-player line for the in-game view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub score: i32,
    pub answered: bool,
}

impl From<&Player> for PlayerStatus {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            avatar: player.avatar.clone(),
            score: player.score,
            answered: player.answered,
        }
    }
}

/// One row of the joinable-rooms list screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomListing {
    pub code: String,
    pub host_name: String,
    pub player_count: usize,
    pub max_players: usize,
}

impl From<&Room> for RoomListing {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.clone(),
            host_name: room.host_name.clone(),
            player_count: room.players.len(),
            max_players: room.max_players,
        }
    }
}

/// Messages the sync loop publishes to whichever view is subscribed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomUpdate {
    Lobby {
        code: String,
        players: Vec<Player>,
        player_count: usize,
        max_players: usize,
        /// True when the room could start; the host view gates the
        /// start control on this plus its own is-host knowledge.
        can_start: bool,
    },
    InGame {
        code: String,
        question_index: usize,
        /// None when the current question is untimed.
        seconds_remaining: Option<u32>,
        players: Vec<PlayerStatus>,
    },
    Finished {
        code: String,
        results: Vec<Player>,
    },
    RoomList {
        rooms: Vec<RoomListing>,
    },
    /// Sent exactly once when the polled room no longer exists.
    RoomGone {
        code: String,
    },
}
