//! Static conversation content
//!
//! Per-level system prompts, conversation starters and the session summary
//! prompt. Everything here is plain data keyed by [`Level`].

mod prompts;
mod starters;

pub use prompts::{summary_prompt, system_prompt, SHORT_SESSION_SUMMARY};
pub use starters::{random_starter, starters};
