use super::session::PracticeSession;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// Shared handle to one session; the mutex serializes every operation on it
pub type SessionHandle = Arc<Mutex<PracticeSession>>;

/// In-memory map of active sessions
///
/// The outer lock is only held for map lookups and updates, so operations
/// on different sessions proceed in parallel. Work on a single session
/// goes through its own mutex.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: PracticeSession) -> SessionHandle {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, Arc::clone(&handle));
        handle
    }

    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }

    pub async fn remove(&self, id: &Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop sessions idle for at least `ttl`.
    ///
    /// Sessions whose lock is currently held are in use and are skipped.
    /// Returns the number of evicted sessions.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(mut session) => {
                if session.idle_for() >= ttl {
                    info!("Evicting idle session {} (user {})", id, session.user_id());
                    session.finish();
                    false
                } else {
                    true
                }
            }
            Err(_) => true,
        });

        before - sessions.len()
    }
}
