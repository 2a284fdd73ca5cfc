use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use quiz_core::Advance;
use quiz_types::GameError;

use crate::session_manager::SessionManager;

pub const DEFAULT_ADVANCE_INTERVAL: Duration = Duration::from_millis(1000);

/// Host-side question clock: checks the active room on a short cadence
/// and advances it when everyone answered or the timer ran out. Owns a
/// single cancellable task like the sync loop; the view that started it
/// stops it when leaving the room.
pub struct GameDriver {
    sessions: Arc<SessionManager>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl GameDriver {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self::with_interval(sessions, DEFAULT_ADVANCE_INTERVAL)
    }

    pub fn with_interval(sessions: Arc<SessionManager>, interval: Duration) -> Self {
        Self {
            sessions,
            interval,
            handle: None,
        }
    }

    pub fn start(&mut self, room_code: &str) {
        self.stop();

        let sessions = self.sessions.clone();
        let code = room_code.to_string();
        let period = self.interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                match sessions.advance_if_due(&code).await {
                    Ok(Some(Advance::Finished { .. })) => {
                        info!("driver for room {code} done, game finished");
                        break;
                    }
                    Ok(_) => {}
                    Err(GameError::RoomNotFound { .. }) => {
                        // room vanished underfoot: silent abort
                        break;
                    }
                    Err(e) => {
                        warn!("driver for room {code} stopping: {e}");
                        break;
                    }
                }
            }
        }));
    }

    /// Cancel the running driver, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for GameDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
