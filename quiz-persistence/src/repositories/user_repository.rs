use chrono::Utc;
use quiz_types::{User, UserStats, ValidationError, avatar_for, new_user_id};
use tracing::info;

use crate::SharedStore;

/// Account CRUD plus the end-of-game stats update. Guests never pass
/// through here; only registered users live in the snapshot.
#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: Option<String>,
    ) -> Result<User, ValidationError> {
        let name = username.trim();
        if name.chars().count() < 2 {
            return Err(ValidationError::NameTooShort);
        }
        if password.chars().count() < 6 {
            return Err(ValidationError::WeakPassword);
        }

        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        if snapshot.users.iter().any(|u| u.username == name) {
            return Err(ValidationError::UsernameTaken {
                username: name.to_string(),
            });
        }

        let user = User {
            id: new_user_id(),
            username: name.to_string(),
            password: Some(password.to_string()),
            email,
            avatar: avatar_for(name),
            stats: UserStats::default(),
            created_at: Utc::now().to_rfc3339(),
        };
        snapshot.users.push(user.clone());
        store.persist();
        info!("created account for {name}");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        let store = self.store.read().await;
        store.snapshot().users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn find_by_credentials(&self, username: &str, password: &str) -> Option<User> {
        let store = self.store.read().await;
        store
            .snapshot()
            .users
            .iter()
            .find(|u| u.username == username && u.password.as_deref() == Some(password))
            .cloned()
    }

    /// Profile edits: username, avatar, email.
    pub async fn update_user<F>(&self, id: &str, mutate: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let user = snapshot.users.iter_mut().find(|u| u.id == id)?;
        mutate(user);
        let updated = user.clone();
        store.persist();
        Some(updated)
    }

    /// Fold one finished game into a user's cumulative stats. Returns
    /// false for unknown ids (guests), which is not an error.
    pub async fn update_user_stats(&self, user_id: &str, score: i32, won: bool) -> bool {
        let mut store = self.store.write().await;
        let snapshot = store.snapshot_mut();
        let Some(user) = snapshot.users.iter_mut().find(|u| u.id == user_id) else {
            return false;
        };
        user.stats.record_game(score, won);
        store.persist();
        true
    }
}
