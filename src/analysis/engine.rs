//! Analysis engine orchestration.
//!
//! The `AnalysisEngine` runs the scripted analysis: a timer marks each
//! loading step in order, then a finalize delay elapses before the run is
//! declared complete. Progress is reported over an internal channel so the
//! session can render steps as they land.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::schema::AnalysisConfig;

use super::state::AnalysisState;

/// Progress report sent from the timer task to the session.
#[derive(Debug, Clone)]
pub enum ProgressUpdate {
    /// A loading step was just marked.
    StepMarked {
        /// Zero-based step index.
        index: usize,
        /// Step label from the pack.
        label: String,
    },
    /// The finalize delay elapsed; the dashboard can load.
    Completed,
}

/// Engine driving the scripted analysis timeline.
///
/// The timeline mirrors the demo script: nothing happens at start, the
/// first step is marked one interval in, and completion lands one interval
/// plus the finalize delay after the last step. With N steps the run takes
/// `(N + 1) * step_interval + finalize_delay`.
pub struct AnalysisEngine {
    /// Loading step labels from the pack.
    steps: Vec<String>,
    /// Delay between step markings.
    step_interval: Duration,
    /// Delay between the last tick and completion.
    finalize_delay: Duration,
    /// Shared run state.
    state: Arc<AnalysisState>,
    /// Channel sender for progress updates.
    update_tx: mpsc::UnboundedSender<ProgressUpdate>,
    /// Channel receiver for progress updates (wrapped in Mutex for single-consumer).
    update_rx: Mutex<mpsc::UnboundedReceiver<ProgressUpdate>>,
    /// Cancellation token for the timer task.
    cancel: CancellationToken,
}

impl AnalysisEngine {
    /// Creates a new engine from the pack's analysis config.
    #[must_use]
    pub fn new(config: &AnalysisConfig) -> Self {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(AnalysisState::new(config.steps.len())),
            step_interval: config.step_interval(),
            finalize_delay: config.finalize_delay(),
            steps: config.steps.clone(),
            update_tx,
            update_rx: Mutex::new(update_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Overrides the delay between step markings.
    #[must_use]
    pub const fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = interval;
        self
    }

    /// Overrides the delay between the last tick and completion.
    #[must_use]
    pub const fn with_finalize_delay(mut self, delay: Duration) -> Self {
        self.finalize_delay = delay;
        self
    }

    /// Starts a run, spawning the timer task.
    ///
    /// Returns `None` without side effects if a run is already in
    /// progress. Step markers are cleared before the new run begins.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.state.try_begin() {
            debug!("analysis already in progress; start ignored");
            return None;
        }
        info!(steps = self.steps.len(), "analysis started");

        let engine = Arc::clone(self);
        Some(tokio::spawn(async move { engine.run().await }))
    }

    /// Drives one run to completion, honoring cancellation.
    async fn run(&self) {
        let start = tokio::time::Instant::now() + self.step_interval;
        let mut ticks = tokio::time::interval_at(start, self.step_interval);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!("analysis task cancelled");
                    return;
                }
                _ = ticks.tick() => {
                    let index = self.state.marked();
                    if index >= self.steps.len() {
                        break;
                    }
                    self.state.mark_next();
                    debug!(index, label = %self.steps[index], "loading step marked");
                    let _ = self.update_tx.send(ProgressUpdate::StepMarked {
                        index,
                        label: self.steps[index].clone(),
                    });
                }
            }
        }

        tokio::select! {
            () = self.cancel.cancelled() => {
                debug!("analysis task cancelled");
            }
            () = tokio::time::sleep(self.finalize_delay) => {
                self.state.complete();
                info!("analysis complete");
                let _ = self.update_tx.send(ProgressUpdate::Completed);
            }
        }
    }

    /// Waits for the next progress update.
    ///
    /// Pends until the timer task sends one; in a `select!` loop the other
    /// branches keep the session responsive while no run is active.
    pub async fn recv_update(&self) -> Option<ProgressUpdate> {
        let mut rx = self.update_rx.lock().await;
        rx.recv().await
    }

    /// Takes a progress update if one is already queued (non-blocking).
    pub async fn try_recv_update(&self) -> Option<ProgressUpdate> {
        let mut rx = self.update_rx.lock().await;
        rx.try_recv().ok()
    }

    /// Returns the shared run state.
    #[must_use]
    pub const fn state(&self) -> &Arc<AnalysisState> {
        &self.state
    }

    /// Returns the loading step labels.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Cancels any in-flight timer task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("num_steps", &self.steps.len())
            .field("step_interval", &self.step_interval)
            .field("finalize_delay", &self.finalize_delay)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
