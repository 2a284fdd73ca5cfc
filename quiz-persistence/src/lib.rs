pub mod repositories;
pub mod snapshot;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use repositories::{ContentRepository, RoomRegistry, UserRepository};
pub use snapshot::{ContentStore, FileBackend, MemoryBackend, Snapshot, StorageBackend};

/// The one store handle every repository shares. All mutations take the
/// write lock, re-read the entity they touch, and persist before
/// releasing, so nothing ever works from a stale copy.
pub type SharedStore = Arc<RwLock<ContentStore>>;

pub fn shared(store: ContentStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}
