//! Structured event stream for `LeaseLens` sessions.
//!
//! Discrete, typed events emitted while a session runs.  Events are
//! serialized as newline-delimited JSON (JSONL) and include a monotonically
//! increasing sequence number for ordering guarantees.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::RiskLevel;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Why the session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The user issued `quit`.
    Quit,
    /// Stdin closed.
    Eof,
    /// Interrupted by a shutdown signal.
    Interrupted,
    /// Unrecoverable error.
    Error,
}

/// Which placeholder notice was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The download action.
    Download,
    /// The share action.
    Share,
    /// A sample document outside the pack's supported category.
    UnsupportedSample,
}

/// Summary statistics emitted when the session stops.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Total commands handled.
    pub commands: u64,
    /// Chat questions asked.
    pub questions: u64,
    /// Analysis runs started.
    pub analyses: u64,
    /// Clause detail views opened.
    pub clauses_opened: u64,
    /// Placeholder notices shown.
    pub notices: u64,
    /// Uptime in seconds.
    pub uptime_secs: f64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "commands={} questions={} analyses={} clauses={} notices={} uptime={:.1}s",
            self.commands,
            self.questions,
            self.analyses,
            self.clauses_opened,
            self.notices,
            self.uptime_secs,
        )
    }
}

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a `LeaseLens` session.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A session began and the home screen was shown.
    SessionStarted {
        /// When the session started.
        timestamp: DateTime<Utc>,
        /// Name of the active document pack.
        pack: String,
    },

    /// The session ended.
    SessionEnded {
        /// When the session ended.
        timestamp: DateTime<Utc>,
        /// Why the session ended.
        reason: StopReason,
        /// Session summary statistics.
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<SessionSummary>,
    },

    /// The active screen changed.
    SectionChanged {
        /// When the change occurred.
        timestamp: DateTime<Utc>,
        /// Screen that was left.
        from: String,
        /// Screen that was entered.
        to: String,
    },

    /// The active dashboard tab changed.
    TabChanged {
        /// When the change occurred.
        timestamp: DateTime<Utc>,
        /// Tab that was left.
        from: String,
        /// Tab that was entered.
        to: String,
    },

    /// An analysis run was accepted and its timers started.
    AnalysisStarted {
        /// When the run started.
        timestamp: DateTime<Utc>,
        /// Number of steps in the run.
        steps: usize,
    },

    /// One analysis step finished.
    StepMarked {
        /// When the step was marked.
        timestamp: DateTime<Utc>,
        /// Zero-based index of the step.
        index: usize,
        /// Display label of the step.
        label: String,
    },

    /// All analysis steps finished and the dashboard became available.
    AnalysisCompleted {
        /// When the run finished.
        timestamp: DateTime<Utc>,
        /// Wall-clock duration of the run in milliseconds.
        elapsed_ms: u64,
    },

    /// The analyzed document was loaded into the session.
    DocumentLoaded {
        /// When the document was loaded.
        timestamp: DateTime<Utc>,
        /// Document title from the pack.
        title: String,
    },

    /// The user submitted a chat question.
    QuestionAsked {
        /// When the question was submitted.
        timestamp: DateTime<Utc>,
        /// The question text as typed.
        question: String,
        /// Whether a canned answer matched.
        matched: bool,
    },

    /// The bot reply was delivered after its canned delay.
    AnswerDelivered {
        /// When the reply was delivered.
        timestamp: DateTime<Utc>,
        /// Index of the canned entry that answered, or `None` for the
        /// fallback answer.
        canned_index: Option<usize>,
    },

    /// A clause detail view was opened.
    ClauseOpened {
        /// When the view was opened.
        timestamp: DateTime<Utc>,
        /// Id of the clause.
        clause_id: String,
        /// Risk level of the clause.
        risk_level: RiskLevel,
    },

    /// The open clause detail view was dismissed.
    ClauseDismissed {
        /// When the view was dismissed.
        timestamp: DateTime<Utc>,
        /// Id of the clause that was open.
        clause_id: String,
    },

    /// A placeholder notice was shown instead of a real action.
    NoticeShown {
        /// When the notice was shown.
        timestamp: DateTime<Utc>,
        /// Which notice.
        notice: NoticeKind,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a sequence number and the owning session id.
///
/// The session id rides in the envelope rather than in each variant so
/// every line of an appended multi-session log stays attributable.
#[derive(Debug, Serialize)]
struct EventEnvelope<'a> {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// Id of the session that emitted the event, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer.  Serialization or I/O failures are silently dropped
/// because observability must never crash the session.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
    session_id: Option<String>,
}

// Box<dyn Write> is not Debug, so provide a manual impl.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
            session_id: None,
        }
    }

    /// Stamps every subsequent envelope with the given session id.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Creates an emitter that writes to stderr.
    ///
    /// Stderr does not conflict with the interactive console, which owns
    /// stdout.  `--events -` on the command line maps here.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that silently discards all events.
    ///
    /// The default when no `--events` destination is given.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that appends to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    ///
    /// Failures are silently dropped; the sequence number still advances so
    /// [`event_count`](Self::event_count) reflects every call.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            session_id: self.session_id.as_deref(),
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Flushes the underlying writer.
    ///
    /// Call this before shutdown to ensure all buffered events reach disk.
    /// Flush failures are silently ignored.
    pub fn flush(&self) {
        if let Ok(mut w) = self.writer.lock() {
            let _ = w.flush();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
