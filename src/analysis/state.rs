//! Analysis progression state.
//!
//! Lock-free atomic state for the scripted analysis run: which phase the
//! run is in and how many loading steps have been marked so far.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::Instant;

const IDLE: usize = 0;
const ANALYZING: usize = 1;
const COMPLETE: usize = 2;

/// Where the scripted analysis currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// No run started, or state reset.
    Idle,
    /// Loading steps are being marked on a timer.
    Analyzing,
    /// The finalize delay elapsed and the document is ready.
    Complete,
}

impl AnalysisPhase {
    const fn from_index(value: usize) -> Self {
        match value {
            ANALYZING => Self::Analyzing,
            COMPLETE => Self::Complete,
            _ => Self::Idle,
        }
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Complete => "complete",
        };
        write!(f, "{name}")
    }
}

/// Lock-free analysis state.
///
/// Uses an `AtomicUsize` for the phase (advanced via CAS) and another for
/// the count of marked steps. Markers are cleared on every transition into
/// [`AnalysisPhase::Analyzing`], so a finished run can be restarted cleanly.
pub struct AnalysisState {
    /// Current phase, one of the index constants above.
    phase: AtomicUsize,
    /// Number of loading steps marked so far; steps are marked in order.
    marked: AtomicUsize,
    /// Timestamp when the current run started.
    started_at: Mutex<Instant>,
    /// Total number of loading steps in the configuration.
    num_steps: usize,
}

impl AnalysisState {
    /// Creates a new state in [`AnalysisPhase::Idle`].
    #[must_use]
    pub fn new(num_steps: usize) -> Self {
        Self {
            phase: AtomicUsize::new(IDLE),
            marked: AtomicUsize::new(0),
            started_at: Mutex::new(Instant::now()),
            num_steps,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> AnalysisPhase {
        AnalysisPhase::from_index(self.phase.load(Ordering::SeqCst))
    }

    /// Returns whether a run is in progress.
    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        self.phase.load(Ordering::SeqCst) == ANALYZING
    }

    /// Returns whether the last run finished.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase.load(Ordering::SeqCst) == COMPLETE
    }

    /// Returns how many loading steps are marked.
    #[must_use]
    pub fn marked(&self) -> usize {
        self.marked.load(Ordering::SeqCst)
    }

    /// Returns the total number of loading steps.
    #[must_use]
    pub const fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Attempts to start a run.
    ///
    /// Succeeds from `Idle` or `Complete`; fails while a run is already in
    /// progress, making concurrent start requests a no-op. On success the
    /// step markers are cleared and the run timer reset.
    pub fn try_begin(&self) -> bool {
        let mut current = self.phase.load(Ordering::SeqCst);
        loop {
            if current == ANALYZING {
                return false;
            }
            match self
                .phase
                .compare_exchange(current, ANALYZING, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => {
                    self.marked.store(0, Ordering::SeqCst);
                    self.reset_run_timer();
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Marks the next loading step.
    ///
    /// Returns the index of the step that was just marked.
    pub fn mark_next(&self) -> usize {
        self.marked.fetch_add(1, Ordering::SeqCst)
    }

    /// Moves the run to [`AnalysisPhase::Complete`].
    pub fn complete(&self) {
        self.phase.store(COMPLETE, Ordering::SeqCst);
    }

    /// Returns the instant the current run started.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        *self.started_at.lock().expect("started_at lock poisoned")
    }

    /// Resets the run timestamp to now.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    fn reset_run_timer(&self) {
        let mut started = self.started_at.lock().expect("started_at lock poisoned");
        *started = Instant::now();
    }
}

impl std::fmt::Debug for AnalysisState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisState")
            .field("phase", &self.phase())
            .field("marked", &self.marked())
            .field("num_steps", &self.num_steps)
            .finish_non_exhaustive()
    }
}
