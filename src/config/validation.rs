//! Document pack validation
//!
//! This module implements schema and semantic validation for `LeaseLens`
//! document packs. Validation runs on the fully deserialized
//! [`DocumentPack`], after parsing.
//!
//! Validation collects ALL errors (doesn't stop at first) to provide
//! comprehensive feedback to users.

use crate::config::schema::DocumentPack;
use crate::error::{Severity, ValidationIssue};

use std::collections::HashSet;

// ============================================================================
// Public API
// ============================================================================

/// Result of pack validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Document pack validator.
///
/// Performs schema validation and semantic validation on a [`DocumentPack`].
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a pack and returns the result.
    ///
    /// This method collects all errors and warnings rather than stopping
    /// at the first issue.
    pub fn validate(&mut self, pack: &DocumentPack) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_metadata(pack);
        self.validate_clauses(pack);
        self.validate_chat(pack);
        self.validate_analysis(pack);
        self.validate_summary(pack);
        self.validate_samples(pack);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Validates pack metadata.
    fn validate_metadata(&mut self, pack: &DocumentPack) {
        if pack.name.is_empty() {
            self.add_error("name", "Pack name is required and cannot be empty");
        }

        if pack.title.is_empty() {
            self.add_warning("title", "Pack title is empty");
        }
    }

    // ========================================================================
    // Clauses
    // ========================================================================

    /// Validates the clause list: non-empty, unique ids, non-empty texts.
    fn validate_clauses(&mut self, pack: &DocumentPack) {
        if pack.clauses.is_empty() {
            self.add_error("clauses", "Pack must define at least one clause");
            return;
        }

        let mut seen_ids: HashSet<&str> = HashSet::new();
        for (i, clause) in pack.clauses.iter().enumerate() {
            let path = format!("clauses[{i}].id");

            if clause.id.is_empty() {
                self.add_error(&path, "Clause id cannot be empty");
            } else if !seen_ids.insert(clause.id.as_str()) {
                self.add_error(&path, "Duplicate clause id");
            }

            if clause.original.is_empty() {
                self.add_error(&format!("clauses[{i}].original"), "Original text is empty");
            }
            if clause.simplified.is_empty() {
                self.add_error(
                    &format!("clauses[{i}].simplified"),
                    "Simplified text is empty",
                );
            }
        }
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// Validates the canned table, matching rules, and reply timing.
    fn validate_chat(&mut self, pack: &DocumentPack) {
        let chat = &pack.chat;

        if chat.canned.is_empty() {
            self.add_warning(
                "chat.canned",
                "Canned table is empty; every question will get the fallback answer",
            );
        }

        let mut seen_questions: HashSet<String> = HashSet::new();
        for (i, qa) in chat.canned.iter().enumerate() {
            if qa.question.is_empty() {
                self.add_error(&format!("chat.canned[{i}].question"), "Question is empty");
                continue;
            }
            if qa.answer.is_empty() {
                self.add_error(&format!("chat.canned[{i}].answer"), "Answer is empty");
            }
            if !seen_questions.insert(qa.question.to_lowercase()) {
                self.add_error(
                    &format!("chat.canned[{i}].question"),
                    "Duplicate canned question",
                );
            }
        }

        for (i, rule) in chat.rules.iter().enumerate() {
            if rule.trigger.is_empty() {
                self.add_error(
                    &format!("chat.rules[{i}].trigger"),
                    "Empty trigger would match every input",
                );
            }
            if rule.requires.is_empty() {
                self.add_error(
                    &format!("chat.rules[{i}].requires"),
                    "Empty requirement would match every canned question",
                );
                continue;
            }

            // Dead rules are allowed but worth flagging.
            let requires = rule.requires.to_lowercase();
            let reachable = chat
                .canned
                .iter()
                .any(|qa| qa.question.to_lowercase().contains(&requires));
            if !reachable {
                self.add_warning(
                    &format!("chat.rules[{i}]"),
                    "Rule never matches any canned question",
                );
            }
        }

        if chat.fallback.is_empty() {
            self.add_error("chat.fallback", "Fallback answer cannot be empty");
        }

        for (i, shortcut) in chat.shortcuts.iter().enumerate() {
            if shortcut.question.is_empty() {
                self.add_error(
                    &format!("chat.shortcuts[{i}].question"),
                    "Shortcut question is empty",
                );
            }
        }

        self.validate_duration("chat.reply_delay", chat.reply_delay.as_deref());
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Validates step labels and timing.
    fn validate_analysis(&mut self, pack: &DocumentPack) {
        let analysis = &pack.analysis;

        if analysis.steps.is_empty() {
            self.add_error("analysis.steps", "At least one analysis step is required");
        }

        for (i, label) in analysis.steps.iter().enumerate() {
            if label.is_empty() {
                self.add_error(&format!("analysis.steps[{i}]"), "Step label is empty");
            }
        }

        self.validate_duration("analysis.step_interval", analysis.step_interval.as_deref());
        self.validate_duration(
            "analysis.finalize_delay",
            analysis.finalize_delay.as_deref(),
        );
    }

    // ========================================================================
    // Summary
    // ========================================================================

    /// Validates the risk summary.
    fn validate_summary(&mut self, pack: &DocumentPack) {
        if pack.summary.risk_score > 10 {
            self.add_error(
                "summary.risk_score",
                "Risk score must be between 0 and 10",
            );
        }
    }

    // ========================================================================
    // Samples
    // ========================================================================

    /// Validates the sample chooser entries.
    fn validate_samples(&mut self, pack: &DocumentPack) {
        let mut seen_ids: HashSet<&str> = HashSet::new();
        for (i, sample) in pack.samples.iter().enumerate() {
            if sample.id.is_empty() {
                self.add_error(&format!("samples[{i}].id"), "Sample id cannot be empty");
            } else if !seen_ids.insert(sample.id.as_str()) {
                self.add_error(&format!("samples[{i}].id"), "Duplicate sample id");
            }

            if !sample.analyzable && sample.subject.is_none() {
                self.add_warning(
                    &format!("samples[{i}].subject"),
                    "Non-analyzable sample has no subject for the unsupported notice",
                );
            }
        }

        if !pack.samples.is_empty() && !pack.samples.iter().any(|s| s.analyzable) {
            self.add_warning("samples", "No sample entry starts analysis");
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Validates an optional humantime duration string.
    ///
    /// Absent values are fine (defaults apply); present values must parse
    /// and be positive.
    fn validate_duration(&mut self, path: &str, value: Option<&str>) {
        let Some(raw) = value else { return };

        match humantime::parse_duration(raw.trim()) {
            Ok(d) if d.is_zero() => {
                self.add_error(path, "Expected a positive duration");
            }
            Ok(_) => {}
            Err(_) => {
                self.add_error(path, "Invalid duration (expected e.g. \"1s\" or \"1500ms\")");
            }
        }
    }

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
