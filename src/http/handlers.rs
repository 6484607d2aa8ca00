use super::state::AppState;
use crate::session::{FinalStats, SessionError, TurnOutcome, TurnStats};
use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Json},
};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const DEFAULT_AUDIO_FILENAME: &str = "audio.webm";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct StartSessionRequest {
    pub user_id: String,

    /// beginner, intermediate or advanced
    pub level: String,

    /// male or female (default: male)
    pub gender: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub message: String,
    /// Base64-encoded WAV of the starter, null when synthesis failed
    pub audio_base64: Option<String>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TextMessageRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Transcribed utterance; only present for voice turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_text: Option<String>,
    pub ai_response: String,
    pub audio_base64: Option<String>,
    pub exchange_count: u32,
    pub stats: TurnStats,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EndSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub summary: String,
    pub stats: FinalStats,
}

fn encode_audio(audio: Option<Vec<u8>>) -> Option<String> {
    audio.map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes))
}

impl TurnResponse {
    fn from_outcome(outcome: TurnOutcome, echo_user_text: bool) -> Self {
        Self {
            user_text: echo_user_text.then_some(outcome.user_text),
            ai_response: outcome.reply,
            audio_base64: encode_audio(outcome.audio),
            exchange_count: outcome.exchange_count,
            stats: outcome.stats,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
/// Start a new practice session
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, SessionError> {
    info!("Start session requested by user {} (level={})", req.user_id, req.level);

    let started = state
        .sessions
        .start(req.user_id, &req.level, req.gender.as_deref())
        .await?;

    Ok(Json(StartSessionResponse {
        session_id: started.session_id.to_string(),
        message: started.message,
        audio_base64: encode_audio(started.audio),
        started_at: started.started_at,
    }))
}

/// POST /session/voice
/// Multipart form with `session_id` and an `audio` file
pub async fn submit_voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TurnResponse>, SessionError> {
    let mut session_id = None;
    let mut audio = None;
    let mut filename = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "session_id" => session_id = Some(field.text().await.map_err(invalid_form)?),
            "audio" => {
                filename = field.file_name().map(str::to_string);
                audio = Some(field.bytes().await.map_err(invalid_form)?.to_vec());
            }
            _ => {}
        }
    }

    let session_id = session_id
        .ok_or_else(|| SessionError::InvalidArgument("Missing field: session_id".to_string()))?;
    let audio =
        audio.ok_or_else(|| SessionError::InvalidArgument("Missing field: audio".to_string()))?;
    let filename = filename
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIO_FILENAME.to_string());

    info!(
        "Voice turn for session {} ({} bytes, {})",
        session_id,
        audio.len(),
        filename
    );

    let outcome = state
        .sessions
        .submit_voice(&session_id, audio, &filename)
        .await
        .inspect_err(|e| error!("Voice turn failed for session {}: {}", session_id, e))?;

    Ok(Json(TurnResponse::from_outcome(outcome, true)))
}

/// POST /session/text
/// Submit a typed message
pub async fn submit_text(
    State(state): State<AppState>,
    Json(req): Json<TextMessageRequest>,
) -> Result<Json<TurnResponse>, SessionError> {
    info!("Text turn for session {}", req.session_id);

    let outcome = state
        .sessions
        .submit_text(&req.session_id, req.message)
        .await
        .inspect_err(|e| error!("Text turn failed for session {}: {}", req.session_id, e))?;

    Ok(Json(TurnResponse::from_outcome(outcome, false)))
}

/// POST /session/end
/// Summarize and close a session
pub async fn end_session(
    State(state): State<AppState>,
    Json(req): Json<EndSessionRequest>,
) -> Result<Json<EndSessionResponse>, SessionError> {
    info!("Ending session {}", req.session_id);

    let ended = state.sessions.end(&req.session_id).await?;

    Ok(Json(EndSessionResponse {
        summary: ended.summary,
        stats: ended.stats,
    }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> SessionError {
    SessionError::InvalidArgument(format!("Invalid multipart form: {}", err))
}
