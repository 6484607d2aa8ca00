//! Practice session management
//!
//! This module provides the session lifecycle for spoken practice:
//! - `PracticeSession`: per-session history, counters and statistics
//! - `SessionStore`: the shared map of active sessions with per-session locks
//! - `SessionManager`: start / turn / end transitions over the AI services
//! - `feedback`: score extraction from assistant replies

mod error;
pub mod feedback;
mod level;
mod manager;
mod session;
mod stats;
mod store;

pub use error::SessionError;
pub use level::{Gender, Level};
pub use manager::{SessionManager, SessionStarted, SessionSummary, TurnOutcome};
pub use session::{PracticeSession, Role, Turn, CONTEXT_WINDOW};
pub use stats::{word_count, FinalStats, SessionStats, TurnStats};
pub use store::{SessionHandle, SessionStore};
