//! Error types for `LeaseLens`
//!
//! This module provides the error hierarchy shared by the pack loader, the
//! interactive session, and the CLI, along with the exit codes each error
//! maps to.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `LeaseLens` CLI operations.
///
/// These codes follow Unix conventions. Demo input inside a running session
/// never maps to a non-zero code; only startup and command failures do.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Document pack error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied, console failure)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, unknown pack name)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `LeaseLens` operations.
///
/// This enum aggregates all domain-specific errors and provides
/// a unified interface for error handling and exit code mapping.
#[derive(Debug, Error)]
pub enum LeaseLensError {
    /// Document pack loading or validation error
    #[error(transparent)]
    Pack(#[from] PackError),

    /// Console I/O error
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid command-line usage
    #[error("{0}")]
    Usage(String),
}

impl LeaseLensError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Pack(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Console(_) | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
        }
    }
}

// ============================================================================
// Document Pack Errors
// ============================================================================

/// Document pack loading and validation errors.
///
/// These errors cover all failure modes during pack parsing and
/// validation, from unreadable files to semantic rule violations.
#[derive(Debug, Error)]
pub enum PackError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the pack file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Pack validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the pack file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced pack file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Required field is missing from the pack
    #[error("missing required field '{field}' at {location}")]
    MissingRequired {
        /// Name of the missing field
        field: String,
        /// Location in the pack (e.g., "clauses[0].id")
        location: String,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in the pack is not set
    #[error("environment variable '{var}' not set (referenced at {location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Location in the pack where it was referenced
        location: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during pack validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "clauses[2].risk_level")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - validation failure that prevents the pack from being used
    Error,
    /// Warning - potential issue that does not prevent pack loading
    Warning,
}

// ============================================================================
// Console Errors
// ============================================================================

/// Console errors for the interactive session's line-oriented I/O.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// I/O error during console operations
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input line exceeds the configured limit
    #[error("input line exceeds {limit} bytes")]
    LineTooLong {
        /// Configured size limit in bytes
        limit: usize,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `LeaseLens` operations.
pub type Result<T> = std::result::Result<T, LeaseLensError>;

// ============================================================================
// Tests
// ============================================================================
