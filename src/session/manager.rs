use super::error::SessionError;
use super::feedback;
use super::level::{Gender, Level};
use super::session::PracticeSession;
use super::stats::{FinalStats, TurnStats};
use super::store::{SessionHandle, SessionStore};
use crate::ai::AiServices;
use crate::content;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of starting a session
#[derive(Debug, Clone)]
pub struct SessionStarted {
    pub session_id: Uuid,
    pub message: String,
    /// Synthesized starter, absent when synthesis failed
    pub audio: Option<Vec<u8>>,
    pub started_at: DateTime<Utc>,
}

/// Result of one completed exchange
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The utterance that was answered (transcribed text for voice turns)
    pub user_text: String,
    pub reply: String,
    pub audio: Option<Vec<u8>>,
    pub exchange_count: u32,
    pub stats: TurnStats,
}

/// Result of ending a session
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub summary: String,
    pub stats: FinalStats,
}

/// Owns every practice session and drives its lifecycle
///
/// Calls out to [`AiServices`] for transcription, replies, speech and the
/// final summary. Operations on one session are serialized by that
/// session's lock; different sessions never wait on each other.
pub struct SessionManager {
    store: SessionStore,
    ai: Arc<dyn AiServices>,
}

impl SessionManager {
    pub fn new(ai: Arc<dyn AiServices>) -> Self {
        Self {
            store: SessionStore::new(),
            ai,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a session, pick a starter for its level and voice it.
    pub async fn start(
        &self,
        user_id: String,
        level: &str,
        gender: Option<&str>,
    ) -> Result<SessionStarted, SessionError> {
        let level: Level = level.parse()?;
        let gender: Gender = match gender {
            Some(g) => g.parse()?,
            None => Gender::default(),
        };

        let starter = content::random_starter(level);
        let session = PracticeSession::new(Uuid::new_v4(), user_id, level, gender, starter);
        let session_id = session.id();
        let started_at = session.started_at();

        info!(
            "Starting session {} for user {} (level={}, gender={})",
            session_id,
            session.user_id(),
            level,
            gender
        );
        self.store.insert(session).await;

        let audio = self.synthesize_soft(starter, level, gender).await;

        Ok(SessionStarted {
            session_id,
            message: starter.to_string(),
            audio,
            started_at,
        })
    }

    /// Answer a typed message
    pub async fn submit_text(
        &self,
        session_id: &str,
        message: String,
    ) -> Result<TurnOutcome, SessionError> {
        let handle = self.lookup(session_id).await?;

        if message.trim().is_empty() {
            return Err(SessionError::InvalidArgument(
                "Message must not be empty".to_string(),
            ));
        }

        self.advance(&handle, message).await
    }

    /// Transcribe recorded audio, then answer it like a typed message
    pub async fn submit_voice(
        &self,
        session_id: &str,
        audio: Vec<u8>,
        filename: &str,
    ) -> Result<TurnOutcome, SessionError> {
        let handle = self.lookup(session_id).await?;

        let user_text = self.ai.transcribe(audio, filename).await.map_err(|e| {
            warn!("Transcription failed for session {}: {}", session_id, e);
            SessionError::from(e)
        })?;

        if user_text.trim().is_empty() {
            return Err(SessionError::InvalidArgument(
                "Could not transcribe audio".to_string(),
            ));
        }

        self.advance(&handle, user_text).await
    }

    /// Summarize and evict a session.
    ///
    /// If the summary call fails the session stays active.
    pub async fn end(&self, session_id: &str) -> Result<SessionSummary, SessionError> {
        let handle = self.lookup(session_id).await?;
        let mut session = handle.lock().await;
        if session.is_ended() {
            return Err(SessionError::NotFound(session_id.to_string()));
        }

        let summary = if session.history().len() < 2 {
            content::SHORT_SESSION_SUMMARY.to_string()
        } else {
            self.ai
                .summarize(&session.user_messages(), session.level())
                .await?
        };

        let id = session.id();
        let stats = FinalStats::from(session.finish());
        self.store.remove(&id).await;

        info!(
            "Ended session {} after {} exchanges (avg score {:.1})",
            id,
            session.exchange_count(),
            stats.avg_score
        );

        Ok(SessionSummary { summary, stats })
    }

    /// Evict sessions idle for at least `ttl`
    pub async fn reap_idle(&self, ttl: Duration) -> usize {
        let evicted = self.store.evict_idle(ttl).await;
        if evicted > 0 {
            info!("Evicted {} idle sessions", evicted);
        }
        evicted
    }

    async fn lookup(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        let not_found = || SessionError::NotFound(session_id.to_string());
        let id = Uuid::parse_str(session_id).map_err(|_| not_found())?;
        self.store.get(&id).await.ok_or_else(not_found)
    }

    /// One exchange. State is committed only once the reply is in; speech
    /// is attempted after the session lock is released.
    async fn advance(
        &self,
        handle: &SessionHandle,
        utterance: String,
    ) -> Result<TurnOutcome, SessionError> {
        let (outcome, speakable, level, gender) = {
            let mut session = handle.lock().await;
            if session.is_ended() {
                return Err(SessionError::NotFound(session.id().to_string()));
            }

            let reply = self
                .ai
                .converse(
                    &utterance,
                    session.level(),
                    session.context_window(),
                    session.exchange_count() + 1,
                )
                .await?;

            let parsed = feedback::parse_reply(&reply);
            let speakable = parsed.speakable.to_string();
            if parsed.score.is_none() && reply.contains(feedback::FEEDBACK_START) {
                warn!("Session {}: feedback block without a usable score", session.id());
            }

            session.record_exchange(utterance.clone(), reply.clone(), parsed.score);

            let outcome = TurnOutcome {
                user_text: utterance,
                reply,
                audio: None,
                exchange_count: session.exchange_count(),
                stats: session.turn_stats(),
            };
            (outcome, speakable, session.level(), session.gender())
        };

        let audio = self.synthesize_soft(&speakable, level, gender).await;
        Ok(TurnOutcome { audio, ..outcome })
    }

    /// Speech is optional: failures are logged and yield `None`
    async fn synthesize_soft(&self, text: &str, level: Level, gender: Gender) -> Option<Vec<u8>> {
        match self.ai.synthesize(text, level, gender).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Speech synthesis skipped: {}", e);
                None
            }
        }
    }
}
