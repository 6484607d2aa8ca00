//! Feedback block parsing
//!
//! The level prompts ask the model to append a block like
//!
//! ```text
//! FEEDBACK_START
//! Grammar: ...
//! Score: 7/10
//! FEEDBACK_END
//! ```
//!
//! to some replies. The block carries a self-reported score and must not be
//! spoken, so a reply is split into its speakable part and an optional score.

pub const FEEDBACK_START: &str = "FEEDBACK_START";
pub const FEEDBACK_END: &str = "FEEDBACK_END";
const SCORE_LABEL: &str = "Score:";

/// Outcome of parsing one assistant reply
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedReply<'a> {
    /// Text to hand to speech synthesis
    pub speakable: &'a str,

    /// Self-reported score, if the reply carried a parseable one
    pub score: Option<f64>,
}

/// Split a reply into its speakable text and optional score.
///
/// Never fails: a missing marker, a missing label or an unparseable number
/// all yield `score: None`.
pub fn parse_reply(reply: &str) -> ParsedReply<'_> {
    ParsedReply {
        speakable: speakable_text(reply),
        score: extract_score(reply),
    }
}

/// Everything before `FEEDBACK_START`, trimmed. Without the marker the whole
/// reply is speakable.
pub fn speakable_text(reply: &str) -> &str {
    match reply.find(FEEDBACK_START) {
        Some(idx) => reply[..idx].trim(),
        None => reply,
    }
}

/// Score from the first line containing `Score:`, only when the reply has a
/// feedback block at all.
///
/// Only the numerator before `/` is read; the divisor is not checked.
pub fn extract_score(reply: &str) -> Option<f64> {
    if !reply.contains(FEEDBACK_START) {
        return None;
    }

    let line = reply.lines().find(|line| line.contains(SCORE_LABEL))?;
    let (_, after_label) = line.split_once(SCORE_LABEL)?;
    let numerator = after_label.split('/').next()?.trim();

    numerator
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
}
