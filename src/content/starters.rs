use crate::session::Level;
use rand::seq::SliceRandom;

const BEGINNER: &[&str] = &[
    "Hello! What is your name?",
    "Hi! How are you today?",
    "Hello! What do you like to eat?",
    "Hi! Do you have a pet?",
];

const INTERMEDIATE: &[&str] = &[
    "Hey! What have you been up to lately?",
    "So, what do you do for work or study?",
    "Tell me, what is your favorite way to spend weekends?",
    "What is something interesting that happened to you recently?",
];

const ADVANCED: &[&str] = &[
    "I would love to hear your thoughts on how social media has transformed the way we form opinions.",
    "What is your perspective on the trade-offs between economic growth and environmental sustainability?",
    "How do you think artificial intelligence will reshape the concept of creativity?",
    "Let us discuss: is globalization ultimately a force for unity or division?",
];

/// Opening lines available for a level
pub fn starters(level: Level) -> &'static [&'static str] {
    match level {
        Level::Beginner => BEGINNER,
        Level::Intermediate => INTERMEDIATE,
        Level::Advanced => ADVANCED,
    }
}

/// Uniformly random opening line for a level
pub fn random_starter(level: Level) -> &'static str {
    let options = starters(level);
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(INTERMEDIATE[0])
}
