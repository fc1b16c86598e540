//! Ordered record of the chat tab.

use chrono::{DateTime, Utc};

/// Who produced a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The person driving the session.
    User,
    /// The scripted assistant.
    Bot,
}

/// A single message in the chat tab.
#[derive(Debug, Clone)]
pub struct ChatEntry {
    /// Who said it.
    pub speaker: Speaker,
    /// Message text.
    pub text: String,
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
}

/// Append-only transcript of the chat tab.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a user message.
    pub fn push_user(&mut self, text: &str) {
        self.push(Speaker::User, text);
    }

    /// Appends an assistant reply.
    pub fn push_bot(&mut self, text: &str) {
        self.push(Speaker::Bot, text);
    }

    fn push(&mut self, speaker: Speaker, text: &str) {
        self.entries.push(ChatEntry {
            speaker,
            text: text.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// All entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been said yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, if any.
    #[must_use]
    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}
