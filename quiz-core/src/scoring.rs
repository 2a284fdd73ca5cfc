use quiz_types::{Player, Room};

/// Floor awarded for any correct answer, timed or not.
pub const MIN_POINTS: i32 = 10;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Remaining whole seconds on a question clock. Recomputed from the
    /// stamped start time on every call so it self-corrects after missed
    /// ticks instead of accumulating drift.
    pub fn seconds_remaining(time_limit: u32, question_start_time: i64, now: i64) -> u32 {
        let elapsed_secs = ((now - question_start_time) / 1000).max(0) as u64;
        (time_limit as u64).saturating_sub(elapsed_secs) as u32
    }

    /// Countdown for a room's current question; None when untimed.
    pub fn room_seconds_remaining(room: &Room, now: i64) -> Option<u32> {
        if room.time_limit == 0 {
            return None;
        }
        room.question_start_time
            .map(|start| Self::seconds_remaining(room.time_limit, start, now))
    }

    /// Points for a correct answer with the given seconds left on the clock.
    pub fn points_for_answer(seconds_remaining: u32) -> i32 {
        MIN_POINTS.max(seconds_remaining as i32 * 2)
    }

    /// Every player tied at the maximum score wins.
    pub fn winner_ids(players: &[Player]) -> Vec<String> {
        let Some(max) = players.iter().map(|p| p.score).max() else {
            return Vec::new();
        };
        players
            .iter()
            .filter(|p| p.score == max)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Final standings: descending by score, ties keep join order.
    pub fn ranked_results(players: &[Player]) -> Vec<Player> {
        let mut results = players.to_vec();
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }
}
