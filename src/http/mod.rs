//! HTTP API for the practice client
//!
//! - POST /session/start - Start a session and get the spoken starter
//! - POST /session/voice - Submit a recorded turn (multipart: session_id, audio)
//! - POST /session/text - Submit a typed turn
//! - POST /session/end - Summarize and close a session
//! - GET /health - Health check

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ErrorResponse;
pub use handlers::{
    EndSessionRequest, EndSessionResponse, StartSessionRequest, StartSessionResponse,
    TextMessageRequest, TurnResponse,
};
pub use routes::create_router;
pub use state::{AppState, DEFAULT_MAX_UPLOAD_BYTES};
