//! Logging initialization for LeaseLens.
//!
//! Logs always go to stderr so they never interleave with the interactive
//! console on stdout. Verbosity is driven by repeated `-v` flags, with the
//! `LEASELENS_LOG_LEVEL` environment variable taking precedence when set
//! (it accepts full `tracing_subscriber::EnvFilter` directives).

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::ColorChoice;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON, one object per log line.
    Json,
}

/// Maps the number of `-v` occurrences to a default filter directive.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global tracing subscriber.
///
/// Safe to call more than once; only the first call takes effect. Tests
/// rely on this when several of them initialize logging.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env("LEASELENS_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    // Module targets are noise at normal verbosity.
    let show_target = verbosity >= 2;

    let ansi = match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_ansi(ansi)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_ansi(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
