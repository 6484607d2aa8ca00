use super::level::{Gender, Level};
use super::stats::{SessionStats, TurnStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Number of most recent history entries forwarded to the model
pub const CONTEXT_WINDOW: usize = 10;

/// Author of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// State of one ongoing practice conversation
///
/// Level and gender are fixed at creation. History is append-only and
/// `exchange_count` always equals the number of user turns in it.
#[derive(Debug)]
pub struct PracticeSession {
    id: Uuid,
    user_id: String,
    level: Level,
    gender: Gender,
    history: Vec<Turn>,
    exchange_count: u32,
    stats: SessionStats,
    started_at: DateTime<Utc>,
    last_active: Instant,
    ended: bool,
}

impl PracticeSession {
    /// Create a session whose history holds only the assistant's starter
    pub fn new(id: Uuid, user_id: String, level: Level, gender: Gender, starter: &str) -> Self {
        Self {
            id,
            user_id,
            level,
            gender,
            history: vec![Turn::assistant(starter)],
            exchange_count: 0,
            stats: SessionStats::default(),
            started_at: Utc::now(),
            last_active: Instant::now(),
            ended: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn exchange_count(&self) -> u32 {
        self.exchange_count
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The last `CONTEXT_WINDOW` history entries
    pub fn context_window(&self) -> &[Turn] {
        let start = self.history.len().saturating_sub(CONTEXT_WINDOW);
        &self.history[start..]
    }

    /// Content of every user-authored turn, oldest first
    pub fn user_messages(&self) -> Vec<&str> {
        self.history
            .iter()
            .filter(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str())
            .collect()
    }

    /// Commit one completed exchange: counters, optional score, then the
    /// user and assistant history entries.
    pub fn record_exchange(&mut self, utterance: String, reply: String, score: Option<f64>) {
        self.stats.record_words(&utterance);
        self.exchange_count += 1;
        if let Some(score) = score {
            self.stats.record_score(score);
        }
        self.history.push(Turn::user(utterance));
        self.history.push(Turn::assistant(reply));
        self.touch();
    }

    pub fn turn_stats(&self) -> TurnStats {
        TurnStats {
            total_words: self.stats.total_words,
            exchanges: self.exchange_count,
            avg_score: self.stats.average_score(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Mark the session terminal and hand back its statistics
    pub fn finish(&mut self) -> SessionStats {
        self.ended = true;
        std::mem::take(&mut self.stats)
    }
}
