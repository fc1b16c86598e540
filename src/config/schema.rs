//! Document pack schema types
//!
//! This module defines the core types for `LeaseLens` document packs.
//! These types are deserialized from YAML pack files and stay immutable
//! for the lifetime of a session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Display title used when a clause does not declare one.
pub const DEFAULT_CLAUSE_TITLE: &str = "Clause Analysis";

/// Default interval between analysis sub-steps.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(1500);

/// Default delay between the last sub-step and the dashboard reveal.
pub const DEFAULT_FINALIZE_DELAY: Duration = Duration::from_millis(1000);

/// Default artificial delay before a chat answer is delivered.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

// ============================================================================
// Top-Level Pack
// ============================================================================

/// Root definition of a `LeaseLens` document pack.
///
/// A pack bundles everything one demo session needs: the sample document
/// profile, annotated clauses, the canned chat table with its matching
/// rules, analysis step labels and timing, the risk summary, placeholder
/// notices, and the sample-document chooser entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DocumentPack {
    /// Pack name (unique identifier, used for registry lookup)
    pub name: String,

    /// Human-readable pack title
    pub title: String,

    /// Short description shown in pack listings
    pub description: String,

    /// Pack category (e.g., "rental")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// The sample document revealed when analysis completes
    pub document: DocumentProfile,

    /// Annotated clauses of the sample document
    pub clauses: Vec<Clause>,

    /// Canned chat table, matching rules, and fallback
    pub chat: ChatConfig,

    /// Analysis step labels and timing
    pub analysis: AnalysisConfig,

    /// Overall risk summary
    pub summary: SummaryConfig,

    /// Placeholder notice texts
    pub notices: Notices,

    /// Sample-document chooser entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<SampleDoc>,
}

impl DocumentPack {
    /// Looks up a clause by identifier.
    #[must_use]
    pub fn clause(&self, id: &str) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.id == id)
    }

    /// Looks up a sample chooser entry by identifier.
    #[must_use]
    pub fn sample(&self, id: &str) -> Option<&SampleDoc> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Counts clauses at the given risk level.
    #[must_use]
    pub fn risk_count(&self, level: RiskLevel) -> usize {
        self.clauses.iter().filter(|c| c.risk_level == level).count()
    }
}

// ============================================================================
// Document Profile
// ============================================================================

/// Profile of the sample document shown on the overview tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DocumentProfile {
    /// Document title (e.g., "Residential Lease Agreement")
    pub title: String,

    /// Document type label (e.g., "Rental Agreement")
    pub doc_type: String,

    /// Parties to the agreement
    pub parties: Parties,

    /// Key lease terms
    pub key_terms: KeyTerms,
}

/// Parties to the sample agreement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Parties {
    /// Landlord name
    pub landlord: String,

    /// Tenant name
    pub tenant: String,
}

/// Key terms of the sample lease.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KeyTerms {
    /// Monthly rent in whole dollars
    pub monthly_rent: u32,

    /// Security deposit in whole dollars
    pub security_deposit: u32,

    /// Lease term (e.g., "12 months")
    pub lease_term: String,

    /// Early termination fee description
    pub early_termination_fee: String,

    /// Notice-to-vacate period (e.g., "60 days")
    pub notice_to_vacate: String,
}

// ============================================================================
// Clauses
// ============================================================================

/// An annotated clause of the sample document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Clause {
    /// Clause identifier (unique within the pack)
    pub id: String,

    /// Display title; falls back to [`DEFAULT_CLAUSE_TITLE`] when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Original legal text
    pub original: String,

    /// Plain-language simplification
    pub simplified: String,

    /// Risk rating
    pub risk_level: RiskLevel,

    /// Explanatory rationale for the rating
    pub explanation: String,
}

impl Clause {
    /// Returns the display title, falling back to [`DEFAULT_CLAUSE_TITLE`].
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_CLAUSE_TITLE)
    }
}

/// Risk rating for a clause.
///
/// Variants are declared low-to-high so the derived ordering sorts
/// ascending by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Standard or tenant-favorable terms
    Low,
    /// Terms worth reviewing
    Medium,
    /// Unusual or tenant-hostile terms
    High,
}

impl RiskLevel {
    /// Capitalized label for badges (e.g., "High").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

// ============================================================================
// Chat
// ============================================================================

/// Canned chat table, matching rules, fallback text, and reply timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatConfig {
    /// Ordered canned question/answer table
    pub canned: Vec<CannedQa>,

    /// Keyword-pair matching rules, in priority order
    pub rules: Vec<MatchRule>,

    /// Fallback answer when no rule matches
    pub fallback: String,

    /// Quick-action shortcuts shown on the overview tab
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shortcuts: Vec<QuickShortcut>,

    /// Artificial reply delay (humantime string, e.g., "1s")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_delay: Option<String>,
}

impl ChatConfig {
    /// Parsed reply delay, falling back to [`DEFAULT_REPLY_DELAY`].
    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        parse_pack_duration(self.reply_delay.as_deref()).unwrap_or(DEFAULT_REPLY_DELAY)
    }
}

/// A canned question/answer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CannedQa {
    /// Canonical question text
    pub question: String,

    /// Fixed answer text
    pub answer: String,
}

/// A keyword-pair matching rule.
///
/// The rule is satisfied for a canned entry when the user input contains
/// `trigger` and the entry's question contains `requires` (both lowercase
/// substring containment).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchRule {
    /// Substring expected in the user input
    pub trigger: String,

    /// Substring expected in the canned question text
    pub requires: String,
}

/// A labeled shortcut that submits a fixed question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QuickShortcut {
    /// Button label (e.g., "Ask About Rent")
    pub label: String,

    /// Question submitted when the shortcut is invoked
    pub question: String,
}

// ============================================================================
// Analysis
// ============================================================================

/// Analysis step labels and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Ordered sub-step labels shown on the progress screen
    pub steps: Vec<String>,

    /// Interval between sub-steps (humantime string, e.g., "1500ms")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_interval: Option<String>,

    /// Delay between the last sub-step and the dashboard reveal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalize_delay: Option<String>,
}

impl AnalysisConfig {
    /// Parsed step interval, falling back to [`DEFAULT_STEP_INTERVAL`].
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        parse_pack_duration(self.step_interval.as_deref()).unwrap_or(DEFAULT_STEP_INTERVAL)
    }

    /// Parsed finalize delay, falling back to [`DEFAULT_FINALIZE_DELAY`].
    #[must_use]
    pub fn finalize_delay(&self) -> Duration {
        parse_pack_duration(self.finalize_delay.as_deref()).unwrap_or(DEFAULT_FINALIZE_DELAY)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Overall risk summary shown on the summary tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryConfig {
    /// Overall risk score out of ten
    pub risk_score: u8,

    /// Free-text recommendation lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

// ============================================================================
// Notices
// ============================================================================

/// Placeholder notice texts for unimplemented surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notices {
    /// Shown when the download action is invoked
    pub download: String,

    /// Shown when the share action is invoked
    pub share: String,

    /// Template shown for non-analyzable samples; `{subject}` is replaced
    /// with the sample's subject text
    pub unsupported_sample: String,
}

impl Notices {
    /// Renders the unsupported-sample notice for the given subject.
    #[must_use]
    pub fn unsupported_for(&self, subject: &str) -> String {
        self.unsupported_sample.replace("{subject}", subject)
    }
}

// ============================================================================
// Samples
// ============================================================================

/// A sample-document chooser entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SampleDoc {
    /// Sample identifier (e.g., "rental")
    pub id: String,

    /// Chooser label
    pub label: String,

    /// Whether selecting this sample starts analysis; non-analyzable
    /// samples produce the unsupported-sample notice instead
    #[serde(default)]
    pub analyzable: bool,

    /// Subject substituted into the unsupported-sample notice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses an optional humantime duration string.
///
/// Unparseable values yield `None`; the validator reports them, so
/// accessors can fall back to defaults without surfacing errors.
fn parse_pack_duration(s: Option<&str>) -> Option<Duration> {
    s.and_then(|raw| humantime::parse_duration(raw.trim()).ok())
}

// ============================================================================
// Tests
// ============================================================================
