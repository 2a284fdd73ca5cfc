use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// None means this is a guest identity that is never persisted.
    pub password: Option<String>,
    pub email: Option<String>,
    pub avatar: String,
    pub stats: UserStats,
    pub created_at: String, // ISO 8601 string
}

impl User {
    pub fn is_guest(&self) -> bool {
        self.password.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub games_played: u32,
    pub games_won: u32,
    pub total_score: i64,
    pub average_score: i64,
    pub best_score: i32,
    pub win_rate: u32,
}

impl UserStats {
    /// Fold one finished game into the cumulative counters.
    /// The derived fields are recomputed here and nowhere else, so they
    /// can never drift from the counters they are derived from.
    pub fn record_game(&mut self, score: i32, won: bool) {
        self.games_played += 1;
        if won {
            self.games_won += 1;
        }
        self.total_score += score as i64;
        if score > self.best_score {
            self.best_score = score;
        }
        self.average_score =
            (self.total_score as f64 / self.games_played as f64).round() as i64;
        self.win_rate =
            (self.games_won as f64 / self.games_played as f64 * 100.0).round() as u32;
    }
}

pub fn new_user_id() -> String {
    format!("user_{}", Uuid::new_v4())
}

pub fn new_guest_id() -> String {
    format!("guest_{}", Uuid::new_v4())
}

/// Default avatar glyph: first character of the name, uppercased.
pub fn avatar_for(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}
