//! Observability: logging setup and the structured session event stream.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter, NoticeKind, SessionSummary, StopReason};
pub use logging::{LogFormat, init_logging, verbosity_to_directive};
