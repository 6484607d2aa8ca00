use crate::session::{Gender, Level};

/// Voice used when the level cannot be resolved
pub const FALLBACK_VOICE: &str = "Atlas-PlayAI";

/// Chat model tier; beginners get the lighter model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Light,
    Heavy,
}

pub fn model_tier(level: Level) -> ModelTier {
    match level {
        Level::Beginner => ModelTier::Light,
        Level::Intermediate | Level::Advanced => ModelTier::Heavy,
    }
}

pub fn voice_for(level: Level, gender: Gender) -> &'static str {
    match (gender, level) {
        (Gender::Male, Level::Beginner) => "Charon-PlayAI",
        (Gender::Male, Level::Intermediate) => "Atlas-PlayAI",
        (Gender::Male, Level::Advanced) => "Orion-PlayAI",
        (Gender::Female, Level::Beginner) => "Celeste-PlayAI",
        (Gender::Female, Level::Intermediate) => "Aoede-PlayAI",
        (Gender::Female, Level::Advanced) => "Leda-PlayAI",
    }
}

/// Voice lookup by level name, falling back to [`FALLBACK_VOICE`]
pub fn voice_for_name(level: &str, gender: Gender) -> &'static str {
    level
        .parse::<Level>()
        .map(|level| voice_for(level, gender))
        .unwrap_or(FALLBACK_VOICE)
}
