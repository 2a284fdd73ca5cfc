use chrono::Utc;
use tracing::info;

use quiz_core::{Advance, AnswerOutcome, ContentEditor, codes, session};
use quiz_persistence::repositories::content_repository::{lookup_content, store_poll};
use quiz_persistence::{ContentRepository, RoomRegistry, SharedStore, UserRepository};
use quiz_types::{Content, GameError, Player, Room, RoomError, ValidationError};

/// How the host picks what to play when starting a game.
#[derive(Debug, Clone)]
pub enum ContentSelector {
    /// A specific quiz or poll by id.
    Explicit(String),
    /// A random public quiz, optionally narrowed to a category. Falls
    /// back to a generated placeholder quiz when nothing matches.
    RandomQuiz { category: Option<String> },
}

/// The in-process API surface a network layer would replace: room
/// create/join/leave plus game progression. Game progression works on
/// the room and its content inside a single store lock per call, so a
/// racing timer can never interleave between read and write.
pub struct SessionManager {
    store: SharedStore,
    rooms: RoomRegistry,
    users: UserRepository,
    contents: ContentRepository,
}

impl SessionManager {
    pub fn new(store: SharedStore) -> Self {
        Self {
            rooms: RoomRegistry::new(store.clone()),
            users: UserRepository::new(store.clone()),
            contents: ContentRepository::new(store.clone()),
            store,
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn contents(&self) -> &ContentRepository {
        &self.contents
    }

    /// Create a room under a freshly drawn code, re-rolling until the
    /// code is unique.
    pub async fn create_room(
        &self,
        host_name: &str,
        host_id: Option<String>,
        content_id: Option<String>,
        time_limit: u32,
    ) -> Result<Room, RoomError> {
        loop {
            let code = codes::generate_room_code();
            match self
                .rooms
                .create_room(&code, host_name, host_id.clone(), content_id.clone(), time_limit)
                .await
            {
                Err(RoomError::CodeTaken { .. }) => continue,
                other => return other,
            }
        }
    }

    pub async fn join_room(
        &self,
        code: &str,
        player_name: &str,
        player_id: Option<String>,
    ) -> Result<Player, RoomError> {
        self.rooms.add_player_to_room(code, player_name, player_id).await
    }

    pub async fn leave_room(&self, code: &str, player_id: &str) {
        self.rooms.remove_player_from_room(code, player_id).await;
    }

    /// Host-only transition into playing. Resolves content, resets the
    /// round state, and stamps the first question's clock.
    pub async fn start_game(
        &self,
        code: &str,
        host_id: &str,
        selector: ContentSelector,
    ) -> Result<Room, GameError> {
        let mut store = self.store.write().await;
        let now = Utc::now().timestamp_millis();
        let snapshot = store.snapshot_mut();

        let content = match selector {
            ContentSelector::Explicit(id) => lookup_content(snapshot, &id)
                .ok_or(GameError::ContentNotFound { id })?,
            ContentSelector::RandomQuiz { category } => {
                match random_public_quiz(snapshot, category.as_deref()) {
                    Some(content) => content,
                    None => {
                        let quiz = ContentEditor::placeholder_quiz(
                            category.as_deref().unwrap_or("general"),
                            host_id,
                        );
                        info!("no public quiz available, generated placeholder {}", quiz.id);
                        snapshot.quizzes.push(quiz.clone());
                        Content::Quiz(quiz)
                    }
                }
            }
        };

        let room = snapshot
            .rooms
            .iter_mut()
            .find(|r| r.code == code)
            .ok_or_else(|| GameError::RoomNotFound {
                code: code.to_string(),
            })?;
        session::start_game(room, &content, host_id, now)?;
        room.last_activity = now;
        let updated = room.clone();
        store.persist();
        info!("game started in room {code} with {}", content.title());
        Ok(updated)
    }

    /// Record one player's answer for the current question.
    pub async fn submit_answer(
        &self,
        code: &str,
        player_id: &str,
        answer_index: usize,
    ) -> Result<AnswerOutcome, GameError> {
        let mut store = self.store.write().await;
        let now = Utc::now().timestamp_millis();
        let snapshot = store.snapshot_mut();

        let room = snapshot
            .rooms
            .iter_mut()
            .find(|r| r.code == code)
            .ok_or_else(|| GameError::RoomNotFound {
                code: code.to_string(),
            })?;
        let content_id = room.content_id.clone().ok_or(GameError::NotPlaying)?;
        let mut content = lookup_content_split(&snapshot.quizzes, &snapshot.polls, &content_id)
            .ok_or(GameError::ContentNotFound { id: content_id })?;

        let outcome = session::submit_answer(room, &mut content, player_id, answer_index, now)?;
        room.last_activity = now;
        if let Content::Poll(poll) = content {
            store_poll(snapshot, poll);
        }
        store.persist();
        Ok(outcome)
    }

    /// Advance past `expected_index` if it is still current. The index
    /// compare inside the lock keeps racing triggers idempotent.
    pub async fn advance_question(
        &self,
        code: &str,
        expected_index: usize,
    ) -> Result<Advance, GameError> {
        let mut store = self.store.write().await;
        let now = Utc::now().timestamp_millis();
        let snapshot = store.snapshot_mut();

        let room = snapshot
            .rooms
            .iter_mut()
            .find(|r| r.code == code)
            .ok_or_else(|| GameError::RoomNotFound {
                code: code.to_string(),
            })?;
        let content_id = room.content_id.clone().ok_or(GameError::NotPlaying)?;
        let content = lookup_content_split(&snapshot.quizzes, &snapshot.polls, &content_id)
            .ok_or(GameError::ContentNotFound { id: content_id })?;

        let advance = session::advance_question(room, &content, expected_index, now)?;
        room.last_activity = now;

        if let Advance::Finished { winner_ids } = &advance {
            let results = room.results.clone().unwrap_or_default();
            for player in &results {
                let won = winner_ids.contains(&player.id);
                if let Some(user) = snapshot.users.iter_mut().find(|u| u.id == player.id) {
                    user.stats.record_game(player.score, won);
                }
            }
            info!("game finished in room {code}, winners: {winner_ids:?}");
        }
        store.persist();
        Ok(advance)
    }

    /// Driver tick: advance when everyone answered or the clock ran
    /// out. Ok(None) means nothing was due.
    pub async fn advance_if_due(&self, code: &str) -> Result<Option<Advance>, GameError> {
        let expected_index = {
            let store = self.store.read().await;
            let now = Utc::now().timestamp_millis();
            let room = store
                .snapshot()
                .rooms
                .iter()
                .find(|r| r.code == code)
                .ok_or_else(|| GameError::RoomNotFound {
                    code: code.to_string(),
                })?;
            if !session::should_advance(room, now) {
                return Ok(None);
            }
            room.current_question_index
        };
        // The lock was released; the index compare in advance_question
        // turns any trigger that beat us here into a no-op.
        self.advance_question(code, expected_index).await.map(Some)
    }

    /// Persist freshly authored content, but only if it passes the
    /// editor gate. A rejected draft leaves the store untouched.
    pub async fn save_content(&self, content: Content) -> Result<String, ValidationError> {
        ContentEditor::validate(&content)?;
        let id = content.id().to_string();
        self.contents.insert(content).await;
        Ok(id)
    }

    /// Re-save an edited draft over its stored version, same gate.
    pub async fn update_content(&self, content: Content) -> Result<(), ValidationError> {
        ContentEditor::validate(&content)?;
        self.contents.replace(content).await;
        Ok(())
    }

    /// Clone a finished room's setup into a fresh waiting room.
    pub async fn play_again(
        &self,
        code: &str,
        host_name: &str,
        host_id: Option<String>,
    ) -> Result<Room, RoomError> {
        let old = self
            .rooms
            .find_room_by_code(code)
            .await
            .ok_or_else(|| RoomError::NotFound {
                code: code.to_string(),
            })?;
        let room = self
            .create_room(host_name, host_id, old.content_id.clone(), old.time_limit)
            .await?;
        info!("room {} replays content of {}", room.code, old.code);
        Ok(room)
    }
}

/// Lookup over the two content tables without borrowing the rooms they
/// sit next to.
fn lookup_content_split(
    quizzes: &[quiz_types::Quiz],
    polls: &[quiz_types::Poll],
    id: &str,
) -> Option<Content> {
    quizzes
        .iter()
        .find(|q| q.id == id)
        .cloned()
        .map(Content::Quiz)
        .or_else(|| polls.iter().find(|p| p.id == id).cloned().map(Content::Poll))
}

fn random_public_quiz(
    snapshot: &quiz_persistence::Snapshot,
    category: Option<&str>,
) -> Option<Content> {
    use rand::Rng;
    let candidates: Vec<&quiz_types::Quiz> = snapshot
        .quizzes
        .iter()
        .filter(|q| q.is_public && !q.questions.is_empty())
        .filter(|q| category.map_or(true, |c| q.category == c))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let index = rand::thread_rng().gen_range(0..candidates.len());
    Some(Content::Quiz(candidates[index].clone()))
}
