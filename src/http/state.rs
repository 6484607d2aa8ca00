use crate::ai::AiServices;
use crate::session::SessionManager;
use std::sync::Arc;

/// Default upper bound for request bodies (voice uploads)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session lifecycle, shared by every request
    pub sessions: Arc<SessionManager>,

    /// Request body limit applied by the router
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(ai: Arc<dyn AiServices>) -> Self {
        Self {
            sessions: Arc::new(SessionManager::new(ai)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}
