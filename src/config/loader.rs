//! Document pack loader
//!
//! This module implements the pack loading pipeline:
//! 1. File size check
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. YAML parsing (with line positions on failure)
//! 4. Deserialization to the typed pack
//! 5. Validation
//! 6. Freeze with `Arc`

use crate::config::schema::DocumentPack;
use crate::config::validation::Validator;
use crate::error::PackError;

use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Public API
// ============================================================================

/// Limits for pack size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct PackLimits {
    /// Maximum pack file size in bytes.
    pub max_pack_size: usize,
}

impl Default for PackLimits {
    fn default() -> Self {
        Self {
            max_pack_size: env_or("LEASELENS_MAX_PACK_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a pack file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated pack.
    pub pack: Arc<DocumentPack>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during pack loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Document pack loader.
///
/// Handles the full loading pipeline from YAML file to frozen
/// [`DocumentPack`].
#[derive(Debug, Default)]
pub struct PackLoader {
    limits: PackLimits,
}

impl PackLoader {
    /// Creates a new pack loader with the given limits.
    #[must_use]
    pub const fn new(limits: PackLimits) -> Self {
        Self { limits }
    }

    /// Creates a new pack loader with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads a pack file and returns the frozen pack.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, exceeds the size limit,
    /// fails to parse, or fails validation.
    pub fn load(&self, path: &Path) -> Result<LoadResult, PackError> {
        let metadata = std::fs::metadata(path).map_err(|_| PackError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.limits.max_pack_size {
            return Err(PackError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.limits.max_pack_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| PackError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_from_str(&raw, path)
    }

    /// Loads a pack from raw YAML text.
    ///
    /// `origin` is used in error messages only; no file I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns an error if the text exceeds the size limit, fails to parse,
    /// or fails validation.
    pub fn load_from_str(&self, raw: &str, origin: &Path) -> Result<LoadResult, PackError> {
        if raw.len() > self.limits.max_pack_size {
            return Err(PackError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{} bytes", raw.len()),
                expected: format!("at most {} bytes", self.limits.max_pack_size),
            });
        }

        // Handle UTF-8 BOM
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        // Stage 1: Environment variable substitution (before YAML parsing)
        let mut env_sub = EnvSubstitution::new();
        let substituted = env_sub.substitute(raw, origin)?;
        let mut warnings = env_sub.warnings;

        // Stage 2: YAML parsing
        let root: serde_yaml::Value =
            serde_yaml::from_str(&substituted).map_err(|e| PackError::ParseError {
                path: origin.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        if root.is_null() {
            return Err(PackError::ParseError {
                path: origin.to_path_buf(),
                line: None,
                message: "Pack file is empty".to_string(),
            });
        }

        // Stage 3: Deserialize to the typed pack
        let pack: DocumentPack =
            serde_yaml::from_value(root).map_err(|e| PackError::ParseError {
                path: origin.to_path_buf(),
                line: None,
                message: format!("Failed to deserialize pack: {e}"),
            })?;

        // Stage 4: Validation
        let result = Validator::new().validate(&pack);
        if result.has_errors() {
            return Err(PackError::ValidationError {
                path: origin.display().to_string(),
                errors: result.errors,
            });
        }

        for issue in result.warnings {
            warnings.push(LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            });
        }

        // Stage 5: Freeze
        Ok(LoadResult {
            pack: Arc::new(pack),
            warnings,
        })
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Pre-parse environment variable substitution.
///
/// Runs on raw YAML text BEFORE parsing to preserve type inference.
/// Supports:
/// - `${VAR}` - expand to value (empty string with warning if unset)
/// - `${VAR:-default}` - expand to default if unset
/// - `${VAR:?message}` - fail if unset
/// - `$$` - literal `$`
///
/// Default values may not contain `}`.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Substitutes environment variables in raw YAML text.
    fn substitute(&mut self, raw: &str, source: &Path) -> Result<String, PackError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(idx) = rest.find('$') {
            out.push_str(&rest[..idx]);
            let after = &rest[idx + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
            } else if let Some(tail) = after.strip_prefix('{') {
                let Some(end) = tail.find('}') else {
                    return Err(PackError::ParseError {
                        path: source.to_path_buf(),
                        line: None,
                        message: "Unclosed environment variable reference".to_string(),
                    });
                };
                let expanded = self.expand(&tail[..end], source)?;
                out.push_str(&expanded);
                rest = &tail[end + 1..];
            } else {
                out.push('$');
                rest = after;
            }
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Expands a single `${...}` expression.
    fn expand(&mut self, expr: &str, source: &Path) -> Result<String, PackError> {
        if let Some((var, default)) = expr.split_once(":-") {
            return Ok(std::env::var(var).unwrap_or_else(|_| default.to_string()));
        }

        if let Some((var, message)) = expr.split_once(":?") {
            return std::env::var(var).map_err(|_| PackError::EnvVarNotSet {
                var: var.to_string(),
                location: message.to_string(),
            });
        }

        match std::env::var(expr) {
            Ok(value) => Ok(value),
            Err(_) => {
                self.warnings.push(LoadWarning {
                    message: format!(
                        "Environment variable '{expr}' is not set, using empty string"
                    ),
                    location: Some(source.display().to_string()),
                });
                Ok(String::new())
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
