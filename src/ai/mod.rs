//! External AI services: speech-to-text, chat completion, speech synthesis
//!
//! The session lifecycle only sees the [`AiServices`] trait. [`GroqClient`]
//! is the production implementation.

mod groq;
pub mod voice;

use crate::session::{Gender, Level, Turn};
use async_trait::async_trait;

pub use groq::GroqClient;
pub use voice::{model_tier, voice_for, ModelTier};

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("completion failed: {0}")]
    Completion(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

/// Operations the session lifecycle needs from the AI provider.
///
/// Every call is a single request/response; nothing is retried.
#[async_trait]
pub trait AiServices: Send + Sync {
    /// Turn recorded audio into English text
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String, AiError>;

    /// Produce the partner's reply to `user_text`.
    ///
    /// `history` is the context window preceding the new turn and
    /// `exchange_count` the number of the exchange being answered.
    async fn converse(
        &self,
        user_text: &str,
        level: Level,
        history: &[Turn],
        exchange_count: u32,
    ) -> Result<String, AiError>;

    /// Render `text` as speech with the voice for `(level, gender)`
    async fn synthesize(&self, text: &str, level: Level, gender: Gender)
        -> Result<Vec<u8>, AiError>;

    /// Free-form end-of-session analysis of the learner's messages
    async fn summarize(&self, user_messages: &[&str], level: Level) -> Result<String, AiError>;
}
