use quiz_types::{Content, GameError, GameState, Room};

use crate::ScoringEngine;

/// Minimum players before the host may start.
pub const MIN_PLAYERS: usize = 2;

/// Events that may change a room's game state.
#[derive(Debug)]
enum SessionEvent {
    Start,
    Finish,
}

/// `transition` is the only code path allowed to write `Room::game_state`;
/// it encodes the legal-transition table waiting -> playing -> finished.
fn transition(room: &mut Room, event: SessionEvent) -> Result<(), GameError> {
    match (room.game_state, &event) {
        (GameState::Waiting, SessionEvent::Start) => {
            room.game_state = GameState::Playing;
            Ok(())
        }
        (GameState::Playing, SessionEvent::Finish) => {
            room.game_state = GameState::Finished;
            Ok(())
        }
        (_, SessionEvent::Start) => Err(GameError::AlreadyStarted),
        (_, SessionEvent::Finish) => Err(GameError::NotPlaying),
    }
}

/// Outcome of a single answer submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Correct quiz answer; points already added to the player.
    Scored { points: i32 },
    /// Wrong quiz answer or a poll vote.
    Recorded,
}

/// Outcome of an advance attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Next { question_index: usize },
    Finished { winner_ids: Vec<String> },
    /// The index moved under us: another trigger already advanced.
    Stale,
}

/// Start a waiting room: host-only, needs at least MIN_PLAYERS players
/// and playable content. Resets results and per-question player state
/// and stamps the first question's clock.
pub fn start_game(
    room: &mut Room,
    content: &Content,
    host_id: &str,
    now: i64,
) -> Result<(), GameError> {
    let host = room.host().ok_or(GameError::NotHost)?;
    if host.id != host_id {
        return Err(GameError::NotHost);
    }
    if room.players.len() < MIN_PLAYERS {
        return Err(GameError::InsufficientPlayers {
            have: room.players.len(),
            need: MIN_PLAYERS,
        });
    }
    if content.question_count() == 0 {
        return Err(GameError::UnplayableContent {
            id: content.id().to_string(),
        });
    }

    transition(room, SessionEvent::Start)?;
    room.content_id = Some(content.id().to_string());
    room.results = None;
    begin_question(room, content, 0, now);
    Ok(())
}

/// Make `index` the current question: stamp the clock, adopt the
/// question's own time limit when it carries one, and clear every
/// player's per-question state.
fn begin_question(room: &mut Room, content: &Content, index: usize, now: i64) {
    room.current_question_index = index;
    if let Some(limit) = content.question_time_limit(index) {
        room.time_limit = limit;
    }
    room.question_start_time = Some(now);
    for player in &mut room.players {
        player.reset_question_state();
    }
}

/// Record one player's answer for the current question. First submission
/// wins; repeats and out-of-phase calls are rejected. A correct quiz
/// answer scores max(10, seconds_remaining * 2); poll votes score nothing.
pub fn submit_answer(
    room: &mut Room,
    content: &mut Content,
    player_id: &str,
    answer_index: usize,
    now: i64,
) -> Result<AnswerOutcome, GameError> {
    if room.game_state != GameState::Playing {
        return Err(GameError::NotPlaying);
    }
    let question_index = room.current_question_index;
    let seconds_left = ScoringEngine::room_seconds_remaining(room, now);

    let player = room
        .player_mut(player_id)
        .ok_or_else(|| GameError::PlayerNotFound {
            id: player_id.to_string(),
        })?;
    if player.answered {
        return Err(GameError::AlreadyAnswered);
    }

    match content {
        Content::Quiz(quiz) => {
            let question = quiz.questions.get(question_index).ok_or(
                GameError::InvalidAnswer { index: answer_index },
            )?;
            let answer = question
                .answers
                .get(answer_index)
                .ok_or(GameError::InvalidAnswer { index: answer_index })?;

            player.answered = true;
            player.current_answer = Some(answer_index);
            if answer.correct {
                let points = ScoringEngine::points_for_answer(seconds_left.unwrap_or(0));
                player.score += points;
                Ok(AnswerOutcome::Scored { points })
            } else {
                Ok(AnswerOutcome::Recorded)
            }
        }
        Content::Poll(poll) => {
            let question = poll.questions.get_mut(question_index).ok_or(
                GameError::InvalidAnswer { index: answer_index },
            )?;
            let option = question
                .options
                .get_mut(answer_index)
                .ok_or(GameError::InvalidAnswer { index: answer_index })?;

            player.answered = true;
            player.current_answer = Some(answer_index);
            option.votes += 1;
            Ok(AnswerOutcome::Recorded)
        }
    }
}

/// True when the current question is done: everyone answered, or the
/// clock ran out. Untimed questions only advance on all-answered.
pub fn should_advance(room: &Room, now: i64) -> bool {
    if room.game_state != GameState::Playing {
        return false;
    }
    if room.all_answered() {
        return true;
    }
    matches!(ScoringEngine::room_seconds_remaining(room, now), Some(0))
}

/// Advance past `expected_index`. The compare on the stored index makes
/// this idempotent under racing triggers: whichever of "all answered"
/// and "timer expired" fires second observes a moved index and becomes
/// a no-op `Stale` instead of a double advance.
pub fn advance_question(
    room: &mut Room,
    content: &Content,
    expected_index: usize,
    now: i64,
) -> Result<Advance, GameError> {
    if room.game_state != GameState::Playing {
        return Ok(Advance::Stale);
    }
    if room.current_question_index != expected_index {
        return Ok(Advance::Stale);
    }

    let last_index = content.question_count().saturating_sub(1);
    if expected_index < last_index {
        begin_question(room, content, expected_index + 1, now);
        Ok(Advance::Next {
            question_index: expected_index + 1,
        })
    } else {
        let winner_ids = finish_game(room)?;
        Ok(Advance::Finished { winner_ids })
    }
}

/// Close out a playing room: winner set is everyone at the maximum
/// score, results are the stable score-descending standings.
fn finish_game(room: &mut Room) -> Result<Vec<String>, GameError> {
    transition(room, SessionEvent::Finish)?;
    let winner_ids = ScoringEngine::winner_ids(&room.players);
    room.results = Some(ScoringEngine::ranked_results(&room.players));
    room.question_start_time = None;
    Ok(winner_ids)
}
