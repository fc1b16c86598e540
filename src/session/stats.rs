//! Per-session action counters.
//!
//! Tracks how often each action kind ran during a session. Counters are
//! lock-free so the session loop and spawned reply tasks can bump them
//! without coordination; the rolled-up [`SessionSummary`] is reported once
//! at session end.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use crate::observability::SessionSummary;

/// Kind key for accepted chat questions.
pub const QUESTION: &str = "question";
/// Kind key for accepted analysis starts.
pub const ANALYSIS: &str = "analysis";
/// Kind key for clause detail views actually opened.
pub const CLAUSE_OPENED: &str = "clause_opened";
/// Kind key for placeholder notices shown.
pub const NOTICE: &str = "notice";

/// Counters for one session.
#[derive(Debug, Default)]
pub struct SessionStats {
    /// Total commands handled, across all kinds.
    commands: AtomicU64,
    /// Count per action kind (command words plus the semantic kinds above).
    counts: DashMap<String, AtomicU64>,
}

impl SessionStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one handled command under its kind.
    ///
    /// Returns the new count for that kind.
    pub fn record_command(&self, kind: &str) -> u64 {
        self.commands.fetch_add(1, Ordering::SeqCst);
        self.increment(kind)
    }

    /// Bumps one action-kind counter and returns the new count.
    pub fn increment(&self, kind: &str) -> u64 {
        let counter = self
            .counts
            .entry(kind.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Total commands handled.
    #[must_use]
    pub fn commands(&self) -> u64 {
        self.commands.load(Ordering::SeqCst)
    }

    /// Current count for one kind, zero if never seen.
    #[must_use]
    pub fn count(&self, kind: &str) -> u64 {
        self.counts
            .get(kind)
            .map_or(0, |counter| counter.load(Ordering::SeqCst))
    }

    /// All kind counters, sorted by kind for stable logging.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::SeqCst)))
            .collect();
        entries.sort();
        entries
    }

    /// Rolls the counters into the summary reported at session end.
    #[must_use]
    pub fn summary(&self, uptime: Duration) -> SessionSummary {
        SessionSummary {
            commands: self.commands(),
            questions: self.count(QUESTION),
            analyses: self.count(ANALYSIS),
            clauses_opened: self.count(CLAUSE_OPENED),
            notices: self.count(NOTICE),
            uptime_secs: uptime.as_secs_f64(),
        }
    }
}
