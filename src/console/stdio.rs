//! Stdio console implementation.
//!
//! Implements the [`Console`] trait over stdin/stdout using a
//! length-limited line codec, so a single unterminated line cannot grow
//! without bound.

use std::str::FromStr;

use futures_util::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use crate::error::ConsoleError;

use super::{Console, DEFAULT_MAX_LINE_LENGTH, DEFAULT_WRITE_BUFFER_SIZE, Result};

/// Configuration for the stdio console.
///
/// Values are read from environment variables with fallback to defaults.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleConfig {
    /// Maximum input line length in bytes.
    pub max_line_length: usize,
    /// Write buffer size in bytes.
    pub write_buffer_size: usize,
}

impl ConsoleConfig {
    /// Loads configuration from environment variables with defaults.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `LEASELENS_MAX_LINE_LENGTH` | 8 KB |
    /// | `LEASELENS_WRITE_BUFFER_SIZE` | 16 KB |
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_line_length: env_or("LEASELENS_MAX_LINE_LENGTH", DEFAULT_MAX_LINE_LENGTH),
            write_buffer_size: env_or("LEASELENS_WRITE_BUFFER_SIZE", DEFAULT_WRITE_BUFFER_SIZE),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            write_buffer_size: DEFAULT_WRITE_BUFFER_SIZE,
        }
    }
}

/// Line console over stdin/stdout.
///
/// Uses separate `tokio::sync::Mutex` locks for reader and writer so reads
/// and writes can proceed concurrently. The async mutex is required because
/// the locks are held across `.await` points.
pub struct StdioConsole {
    reader: Mutex<FramedRead<tokio::io::Stdin, LinesCodec>>,
    writer: Mutex<BufWriter<tokio::io::Stdout>>,
    config: ConsoleConfig,
}

impl StdioConsole {
    /// Creates a stdio console with configuration from environment variables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ConsoleConfig::from_env())
    }

    /// Creates a stdio console with explicit configuration.
    #[must_use]
    pub fn with_config(config: ConsoleConfig) -> Self {
        Self {
            reader: Mutex::new(FramedRead::new(
                tokio::io::stdin(),
                LinesCodec::new_with_max_length(config.max_line_length),
            )),
            writer: Mutex::new(BufWriter::with_capacity(
                config.write_buffer_size,
                tokio::io::stdout(),
            )),
            config,
        }
    }
}

impl Default for StdioConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StdioConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdioConsole")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Console for StdioConsole {
    async fn read_line(&self) -> Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        match reader.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                // The codec discards through the next newline, so the
                // session can report this and keep reading.
                Err(ConsoleError::LineTooLong {
                    limit: self.config.max_line_length,
                })
            }
            Some(Err(LinesCodecError::Io(e))) => Err(ConsoleError::Io(e)),
            None => Ok(None),
        }
    }

    async fn write_line(&self, text: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(text.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        drop(writer);
        Ok(())
    }

    async fn write_prompt(&self, text: &str) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
        drop(writer);
        Ok(())
    }
}

/// Reads an environment variable, parsing it to type `T`, or returns the default.
///
/// Logs a warning if the variable is set but cannot be parsed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(name, value = %v, "invalid env var value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_config_default() {
        let config = ConsoleConfig::default();
        assert_eq!(config.max_line_length, DEFAULT_MAX_LINE_LENGTH);
        assert_eq!(config.write_buffer_size, DEFAULT_WRITE_BUFFER_SIZE);
    }

    #[test]
    fn test_env_or_default() {
        let result: usize = env_or("LEASELENS_TEST_NONEXISTENT_VAR_12345", 42);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_console_debug() {
        let console = StdioConsole::with_config(ConsoleConfig::default());
        let debug = format!("{console:?}");
        assert!(debug.contains("StdioConsole"));
        assert!(debug.contains("config"));
    }
}
