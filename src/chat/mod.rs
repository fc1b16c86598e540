//! Clause chat: keyword routing and the session transcript.

pub mod matcher;
pub mod transcript;

pub use matcher::QuestionMatcher;
pub use transcript::{ChatEntry, Speaker, Transcript};
