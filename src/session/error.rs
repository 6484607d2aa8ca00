use crate::ai::AiError;

/// Failures surfaced by the session lifecycle
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Session {0} not found")]
    NotFound(String),

    #[error("STT Error: {0}")]
    Transcription(String),

    #[error("Completion error: {0}")]
    Completion(String),
}

impl From<AiError> for SessionError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Transcription(msg) => SessionError::Transcription(msg),
            // Synthesis failures are swallowed by the lifecycle before this point
            AiError::Completion(msg) | AiError::Synthesis(msg) => SessionError::Completion(msg),
        }
    }
}
