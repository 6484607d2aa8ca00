use serde::{Deserialize, Serialize};

/// Statistics accumulated over a practice session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whitespace-separated words across every user turn
    pub total_words: usize,

    /// Self-reported scores, in the order they were received
    pub scores: Vec<f64>,

    /// Not tracked yet; always 0
    pub duration_seconds: u64,
}

impl SessionStats {
    pub fn record_words(&mut self, utterance: &str) {
        self.total_words += word_count(utterance);
    }

    pub fn record_score(&mut self, score: f64) {
        self.scores.push(score);
    }

    /// Running average rounded to one decimal, `None` until a score arrives
    pub fn average_score(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let mean = self.scores.iter().sum::<f64>() / self.scores.len() as f64;
        Some(round_one_decimal(mean))
    }

    /// Average reported when a session ends: 0 when no score was recorded
    pub fn final_average_score(&self) -> f64 {
        self.average_score().unwrap_or(0.0)
    }
}

/// Counters returned after every turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnStats {
    pub total_words: usize,
    pub exchanges: u32,
    pub avg_score: Option<f64>,
}

/// Statistics returned when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStats {
    pub total_words: usize,
    pub scores: Vec<f64>,
    pub avg_score: f64,
    pub duration_seconds: u64,
}

impl From<SessionStats> for FinalStats {
    fn from(stats: SessionStats) -> Self {
        let avg_score = stats.final_average_score();
        Self {
            total_words: stats.total_words,
            scores: stats.scores,
            avg_score,
            duration_seconds: stats.duration_seconds,
        }
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round the exact binary value to one decimal, ties to even.
///
/// `{:.1}` formatting rounds the exact value, so 7.25 becomes 7.2.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
