use serde::{Deserialize, Serialize};

use crate::user::avatar_for;

pub const MAX_PLAYERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_host: bool,
    pub score: i32,
    pub ready: bool,
    pub answered: bool,
    pub current_answer: Option<usize>,
}

impl Player {
    pub fn new(id: String, name: &str, is_host: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            avatar: avatar_for(name),
            is_host,
            score: 0,
            ready: false,
            answered: false,
            current_answer: None,
        }
    }

    /// Clear the per-question transient fields.
    pub fn reset_question_state(&mut self) {
        self.answered = false;
        self.current_answer = None;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// 6-character uppercase alphanumeric join handle.
    pub code: String,
    pub host_id: Option<String>,
    pub host_name: String,
    pub players: Vec<Player>,
    pub max_players: usize,
    pub game_state: GameState,
    pub content_id: Option<String>,
    pub current_question_index: usize,
    /// Seconds per question; 0 means untimed.
    pub time_limit: u32,
    /// Epoch millis of the moment the current question became current.
    pub question_start_time: Option<i64>,
    pub created_at: i64,
    pub last_activity: i64,
    /// Final standings, set once when the game finishes.
    pub results: Option<Vec<Player>>,
}

impl Room {
    pub fn new(
        code: &str,
        host_name: &str,
        host_id: Option<String>,
        content_id: Option<String>,
        time_limit: u32,
        now: i64,
    ) -> Self {
        let host_player_id = host_id
            .clone()
            .unwrap_or_else(crate::user::new_guest_id);
        Self {
            code: code.to_string(),
            host_id,
            host_name: host_name.to_string(),
            players: vec![Player::new(host_player_id, host_name, true)],
            max_players: MAX_PLAYERS,
            game_state: GameState::Waiting,
            content_id,
            current_question_index: 0,
            time_limit,
            question_start_time: None,
            created_at: now,
            last_activity: now,
            results: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn all_answered(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.answered)
    }
}
