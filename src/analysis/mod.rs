//! Scripted analysis progression.

pub mod engine;
pub mod state;

pub use engine::{AnalysisEngine, ProgressUpdate};
pub use state::{AnalysisPhase, AnalysisState};
