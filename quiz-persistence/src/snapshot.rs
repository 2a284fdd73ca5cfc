use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use chrono::Utc;
use quiz_types::{Answer, Difficulty, Poll, Quiz, QuizQuestion, Room, User, new_quiz_id};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// The one persisted blob: everything the app knows, per installation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub rooms: Vec<Room>,
    pub quizzes: Vec<Quiz>,
    pub polls: Vec<Poll>,
    /// Most-recent-first room codes, max 5 entries.
    pub recent_rooms: Vec<String>,
}

/// Where the snapshot blob lives. Implementations only move strings;
/// the store owns serialization and failure policy.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, blob: &str) -> Result<()>;
}

/// JSON file on disk.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, blob)?;
        Ok(())
    }
}

/// In-memory backend for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryBackend {
    blob: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: &str) -> Self {
        Self {
            blob: Mutex::new(Some(blob.to_string())),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.blob.lock().unwrap().clone())
    }

    fn save(&self, blob: &str) -> Result<()> {
        *self.blob.lock().unwrap() = Some(blob.to_string());
        Ok(())
    }
}

/// Persistence facade: the in-memory snapshot is the source of truth,
/// the backend is written to on a best-effort basis after every
/// mutation. Unreadable or corrupt storage never takes the app down.
pub struct ContentStore {
    snapshot: Snapshot,
    backend: Box<dyn StorageBackend>,
}

impl ContentStore {
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let snapshot = match backend.load() {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("stored snapshot is corrupt, starting fresh: {e}");
                    Self::seeded_snapshot()
                }
            },
            Ok(None) => {
                info!("no stored snapshot, starting fresh");
                Self::seeded_snapshot()
            }
            Err(e) => {
                warn!("failed to read snapshot, starting fresh: {e}");
                Self::seeded_snapshot()
            }
        };
        let mut store = Self { snapshot, backend };
        store.persist();
        store
    }

    /// A fresh installation ships with one public demo quiz so the
    /// first game always has something to play.
    fn seeded_snapshot() -> Snapshot {
        let question = |text: &str, options: [&str; 4], correct: usize| QuizQuestion {
            text: text.to_string(),
            answers: options
                .iter()
                .enumerate()
                .map(|(i, o)| Answer {
                    text: o.to_string(),
                    correct: i == correct,
                })
                .collect(),
            time_limit: 20,
        };
        Snapshot {
            quizzes: vec![Quiz {
                id: new_quiz_id(),
                title: "General quiz".to_string(),
                description: "A little bit of everything".to_string(),
                category: "general".to_string(),
                difficulty: Difficulty::Easy,
                questions: vec![
                    question(
                        "How many planets are in the Solar System?",
                        ["7", "8", "9", "10"],
                        1,
                    ),
                    question(
                        "What is the chemical symbol for gold?",
                        ["Ag", "Au", "Gd", "Go"],
                        1,
                    ),
                ],
                created_by: "system".to_string(),
                is_public: true,
                created_at: Utc::now().to_rfc3339(),
            }],
            ..Snapshot::default()
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn snapshot_mut(&mut self) -> &mut Snapshot {
        &mut self.snapshot
    }

    /// Best-effort write-through. A failed write is logged and the
    /// in-memory state keeps serving; the next successful persist
    /// carries the accumulated changes.
    pub fn persist(&mut self) {
        match serde_json::to_string(&self.snapshot) {
            Ok(blob) => {
                if let Err(e) = self.backend.save(&blob) {
                    warn!("failed to persist snapshot, keeping in-memory state: {e}");
                }
            }
            Err(e) => warn!("failed to serialize snapshot: {e}"),
        }
    }
}
