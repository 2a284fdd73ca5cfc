use quiz_types::{Content, Poll, Quiz};
use rand::Rng;
use tracing::info;

use crate::SharedStore;
use crate::snapshot::Snapshot;

/// CRUD for quiz/poll aggregates. Validation lives in the editor; this
/// repository assumes its inputs already passed the gate.
#[derive(Clone)]
pub struct ContentRepository {
    store: SharedStore,
}

impl ContentRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn insert(&self, content: Content) {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        match content {
            Content::Quiz(quiz) => {
                info!("saved quiz {} ({})", quiz.title, quiz.id);
                snapshot.quizzes.push(quiz);
            }
            Content::Poll(poll) => {
                info!("saved poll {} ({})", poll.title, poll.id);
                snapshot.polls.push(poll);
            }
        }
        store.persist();
    }

    /// Upsert by id, used by the editor's edit-and-resave flow.
    pub async fn replace(&self, content: Content) {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        match content {
            Content::Quiz(quiz) => {
                snapshot.quizzes.retain(|q| q.id != quiz.id);
                snapshot.quizzes.push(quiz);
            }
            Content::Poll(poll) => {
                snapshot.polls.retain(|p| p.id != poll.id);
                snapshot.polls.push(poll);
            }
        }
        store.persist();
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Content> {
        let store = self.store.read().await;
        lookup_content(store.snapshot(), id)
    }

    pub async fn find_by_user(&self, user_id: &str) -> Vec<Content> {
        let store = self.store.read().await;
        let snapshot = store.snapshot();
        snapshot
            .quizzes
            .iter()
            .filter(|q| q.created_by == user_id)
            .cloned()
            .map(Content::Quiz)
            .chain(
                snapshot
                    .polls
                    .iter()
                    .filter(|p| p.created_by == user_id)
                    .cloned()
                    .map(Content::Poll),
            )
            .collect()
    }

    pub async fn public_in_category(&self, category: &str) -> Vec<Content> {
        let store = self.store.read().await;
        let snapshot = store.snapshot();
        snapshot
            .quizzes
            .iter()
            .filter(|q| q.is_public && q.category == category)
            .cloned()
            .map(Content::Quiz)
            .chain(
                snapshot
                    .polls
                    .iter()
                    .filter(|p| p.is_public && p.category == category)
                    .cloned()
                    .map(Content::Poll),
            )
            .collect()
    }

    /// Random pick among public quizzes, optionally narrowed to a
    /// category. None when nothing matches.
    pub async fn random_public_quiz(&self, category: Option<&str>) -> Option<Content> {
        let store = self.store.read().await;
        let candidates: Vec<&Quiz> = store
            .snapshot()
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

    pub async fn delete(&self, id: &str) -> bool {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let before = snapshot.quizzes.len() + snapshot.polls.len();
        snapshot.quizzes.retain(|q| q.id != id);
        snapshot.polls.retain(|p| p.id != id);
        let deleted = snapshot.quizzes.len() + snapshot.polls.len() != before;
        if deleted {
            store.persist();
            info!("deleted content {id}");
        }
        deleted
    }
}

/// Shared lookup over both content tables.
pub fn lookup_content(snapshot: &Snapshot, id: &str) -> Option<Content> {
    snapshot
        .quizzes
        .iter()
        .find(|q| q.id == id)
        .cloned()
        .map(Content::Quiz)
        .or_else(|| {
            snapshot
                .polls
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .map(Content::Poll)
        })
}

/// Write a poll back into the snapshot after its vote counts changed.
pub fn store_poll(snapshot: &mut Snapshot, poll: Poll) {
    if let Some(slot) = snapshot.polls.iter_mut().find(|p| p.id == poll.id) {
        *slot = poll;
    }
}
