pub mod ai;
pub mod config;
pub mod content;
pub mod http;
pub mod session;

pub use ai::{AiError, AiServices, GroqClient};
pub use config::Config;
pub use http::{create_router, AppState};
pub use session::{
    FinalStats, Gender, Level, PracticeSession, SessionError, SessionManager, SessionStats,
    TurnStats,
};
