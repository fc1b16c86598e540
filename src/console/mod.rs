//! Console abstraction layer.
//!
//! Provides the [`Console`] trait for line-oriented terminal I/O. The
//! session reads commands and writes rendered views through this trait so
//! tests can drive it with a scripted console.

pub mod stdio;

pub use stdio::StdioConsole;

pub use crate::error::ConsoleError;

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Default maximum input line length in bytes (8 KB).
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

/// Default write buffer size in bytes (16 KB).
pub const DEFAULT_WRITE_BUFFER_SIZE: usize = 16 * 1024;

/// Async console trait for the interactive session.
///
/// Implementations use `&self` with interior mutability (via
/// `tokio::sync::Mutex`) so the session can share the console across
/// concurrent read and write paths.
#[async_trait::async_trait]
pub trait Console: Send + Sync {
    /// Reads the next input line, without its terminator.
    ///
    /// Returns `Ok(None)` on EOF (clean shutdown).
    async fn read_line(&self) -> Result<Option<String>>;

    /// Writes a line of output followed by a newline, then flushes.
    async fn write_line(&self, text: &str) -> Result<()>;

    /// Writes a prompt without a trailing newline, then flushes.
    async fn write_prompt(&self, text: &str) -> Result<()>;
}

/// Truncates and strips control characters from untrusted input before logging.
///
/// Replaces control characters (except tab) with the Unicode replacement
/// character to prevent log injection via raw console input.
#[must_use]
pub fn sanitize_for_log(input: &str, max_len: usize) -> String {
    input
        .chars()
        .take(max_len)
        .map(|c| {
            if c.is_control() && c != '\t' {
                '\u{FFFD}'
            } else {
                c
            }
        })
        .collect()
}
