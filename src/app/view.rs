//! Typed terminal views.
//!
//! One view struct per screen, each rendering through `Display` so the
//! console layer stays a dumb writer. Views borrow the pack and state;
//! nothing here mutates anything.

use std::fmt;

use crate::chat::{Speaker, Transcript};
use crate::config::schema::{Clause, DocumentPack, RiskLevel};

use super::state::Tab;

/// Landing screen.
pub struct HomeView<'a> {
    pack: &'a DocumentPack,
}

impl<'a> HomeView<'a> {
    /// Builds the view for the given pack.
    #[must_use]
    pub const fn new(pack: &'a DocumentPack) -> Self {
        Self { pack }
    }
}

impl fmt::Display for HomeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.pack.title)?;
        writeln!(f)?;
        writeln!(f, "{}", self.pack.description)?;
        writeln!(f)?;
        writeln!(f, "  {:<10}{}", "demo", "run the sample analysis")?;
        writeln!(f, "  {:<10}{}", "upload", "bring your own document")?;
        write!(f, "  {:<10}{}", "help", "list every command")
    }
}

/// Upload screen with dropzone stand-ins and sample documents.
pub struct UploadView<'a> {
    pack: &'a DocumentPack,
}

impl<'a> UploadView<'a> {
    /// Builds the view for the given pack.
    #[must_use]
    pub const fn new(pack: &'a DocumentPack) -> Self {
        Self { pack }
    }
}

impl fmt::Display for UploadView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Upload a document ==")?;
        writeln!(f)?;
        writeln!(
            f,
            "Drop a file with 'drop <path>' or browse with 'pick <path>'."
        )?;
        if !self.pack.samples.is_empty() {
            writeln!(f)?;
            writeln!(f, "Or try a sample:")?;
            for sample in &self.pack.samples {
                writeln!(f, "  sample {:<10}{}", sample.id, sample.label)?;
            }
        }
        Ok(())
    }
}

/// Loading screen listing analysis steps with their markers.
pub struct ProgressView<'a> {
    steps: &'a [String],
    marked: usize,
}

impl<'a> ProgressView<'a> {
    /// Builds the view from the step labels and the count already marked.
    #[must_use]
    pub const fn new(steps: &'a [String], marked: usize) -> Self {
        Self { steps, marked }
    }
}

impl fmt::Display for ProgressView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Analyzing your document ==")?;
        writeln!(f)?;
        for (index, label) in self.steps.iter().enumerate() {
            let marker = if index < self.marked { "x" } else { " " };
            writeln!(f, "  [{marker}] {label}")?;
        }
        Ok(())
    }
}

/// Results dashboard: header, tab bar, and the active tab's body.
pub struct DashboardView<'a> {
    pack: &'a DocumentPack,
    tab: Tab,
    transcript: &'a Transcript,
}

impl<'a> DashboardView<'a> {
    /// Builds the view for the given pack, active tab, and chat transcript.
    #[must_use]
    pub const fn new(pack: &'a DocumentPack, tab: Tab, transcript: &'a Transcript) -> Self {
        Self {
            pack,
            tab,
            transcript,
        }
    }

    fn tab_bar(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bar: Vec<String> = Tab::ALL
            .into_iter()
            .map(|tab| {
                if tab == self.tab {
                    format!("[{}]", tab.name())
                } else {
                    format!(" {} ", tab.name())
                }
            })
            .collect();
        writeln!(f, "{}", bar.join(" "))
    }

    fn overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = &self.pack.document;
        writeln!(f, "{:<24}{}", "Document type:", doc.doc_type)?;
        writeln!(f, "{:<24}{}", "Landlord:", doc.parties.landlord)?;
        writeln!(f, "{:<24}{}", "Tenant:", doc.parties.tenant)?;
        writeln!(f)?;
        writeln!(f, "Key terms:")?;
        let terms = &doc.key_terms;
        writeln!(f, "  {:<24}${}", "Monthly rent:", terms.monthly_rent)?;
        writeln!(f, "  {:<24}${}", "Security deposit:", terms.security_deposit)?;
        writeln!(f, "  {:<24}{}", "Lease term:", terms.lease_term)?;
        writeln!(
            f,
            "  {:<24}{}",
            "Early termination fee:", terms.early_termination_fee
        )?;
        writeln!(f, "  {:<24}{}", "Notice to vacate:", terms.notice_to_vacate)?;
        writeln!(f)?;
        writeln!(
            f,
            "Risks found: {} high, {} medium, {} low",
            self.pack.risk_count(RiskLevel::High),
            self.pack.risk_count(RiskLevel::Medium),
            self.pack.risk_count(RiskLevel::Low)
        )?;
        write!(f, "Open a clause with 'clause <id>':")?;
        for clause in &self.pack.clauses {
            write!(f, "\n  {:<24}{}", clause.id, clause.display_title())?;
        }
        Ok(())
    }

    fn simplified(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, clause) in self.pack.clauses.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}. {}", index + 1, clause.display_title())?;
            writeln!(f, "   {}", clause.simplified)?;
        }
        Ok(())
    }

    fn risks(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Highest severity first, pack order within a level
        let mut clauses: Vec<&Clause> = self.pack.clauses.iter().collect();
        clauses.sort_by(|a, b| b.risk_level.cmp(&a.risk_level));
        for (index, clause) in clauses.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(
                f,
                "[{} Risk] {}",
                clause.risk_level.label(),
                clause.display_title()
            )?;
            writeln!(f, "  {}", clause.explanation)?;
        }
        Ok(())
    }

    fn chat(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.transcript.is_empty() {
            writeln!(f, "No questions yet. Ask one with 'ask <question>'.")?;
        } else {
            for entry in self.transcript.entries() {
                let speaker = match entry.speaker {
                    Speaker::User => "You",
                    Speaker::Bot => "Bot",
                };
                writeln!(f, "{speaker}: {}", entry.text)?;
            }
        }

        let chat = &self.pack.chat;
        if !chat.canned.is_empty() || !chat.shortcuts.is_empty() {
            writeln!(f)?;
            writeln!(f, "Quick questions:")?;
            let mut number = 1;
            for qa in &chat.canned {
                writeln!(f, "  quick {number:<4}{}", qa.question)?;
                number += 1;
            }
            for shortcut in &chat.shortcuts {
                writeln!(f, "  quick {number:<4}{}", shortcut.label)?;
                number += 1;
            }
        }
        Ok(())
    }

    fn summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Risk score: {}/10", self.pack.summary.risk_score)?;
        if !self.pack.summary.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recommendations:")?;
            for recommendation in &self.pack.summary.recommendations {
                writeln!(f, "  - {recommendation}")?;
            }
        }
        writeln!(f)?;
        write!(f, "Actions: download | share")
    }
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.pack.document.title)?;
        self.tab_bar(f)?;
        writeln!(f)?;
        match self.tab {
            Tab::Overview => self.overview(f),
            Tab::Simplified => self.simplified(f),
            Tab::Risks => self.risks(f),
            Tab::Chat => self.chat(f),
            Tab::Summary => self.summary(f),
        }
    }
}

/// Clause detail, the terminal stand-in for the clause modal.
pub struct ClauseDetailView<'a> {
    clause: &'a Clause,
}

impl<'a> ClauseDetailView<'a> {
    /// Builds the view for one clause.
    #[must_use]
    pub const fn new(clause: &'a Clause) -> Self {
        Self { clause }
    }
}

impl fmt::Display for ClauseDetailView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "== {} ==  [{} Risk]",
            self.clause.display_title(),
            self.clause.risk_level.label()
        )?;
        writeln!(f)?;
        writeln!(f, "Original text:")?;
        writeln!(f, "  {}", self.clause.original)?;
        writeln!(f)?;
        writeln!(f, "In plain language:")?;
        writeln!(f, "  {}", self.clause.simplified)?;
        writeln!(f)?;
        writeln!(f, "Why this matters:")?;
        writeln!(f, "  {}", self.clause.explanation)?;
        writeln!(f)?;
        write!(f, "(esc to close)")
    }
}

/// One-line notice, the terminal stand-in for an alert.
pub struct NoticeView<'a> {
    text: &'a str,
}

impl<'a> NoticeView<'a> {
    /// Builds the view for the given notice text.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl fmt::Display for NoticeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notice: {}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::PackLoader;
    use crate::packs;
    use std::path::Path;
    use std::sync::Arc;

    fn pack() -> Arc<DocumentPack> {
        let loader = PackLoader::with_defaults();
        let builtin = packs::find_pack(packs::DEFAULT_PACK).unwrap();
        loader
            .load_from_str(builtin.yaml, Path::new("test"))
            .unwrap()
            .pack
    }

    #[test]
    fn test_home_view_shows_title_and_commands() {
        let pack = pack();
        let rendered = HomeView::new(&pack).to_string();
        assert!(rendered.contains("== Rental Agreement Analysis =="));
        assert!(rendered.contains("demo"));
        assert!(rendered.contains("upload"));
    }

    #[test]
    fn test_upload_view_lists_samples() {
        let pack = pack();
        let rendered = UploadView::new(&pack).to_string();
        assert!(rendered.contains("sample rental"));
        assert!(rendered.contains("Loan Contract"));
        assert!(rendered.contains("Terms of Service"));
    }

    #[test]
    fn test_progress_view_marks_steps() {
        let pack = pack();
        let rendered = ProgressView::new(&pack.analysis.steps, 2).to_string();
        assert!(rendered.contains("[x] Scanning document structure"));
        assert!(rendered.contains("[x] Identifying key clauses"));
        assert!(rendered.contains("[ ] Assessing risk factors"));
        assert!(rendered.contains("[ ] Generating recommendations"));
    }

    #[test]
    fn test_dashboard_overview_shows_key_terms() {
        let pack = pack();
        let transcript = Transcript::new();
        let rendered = DashboardView::new(&pack, Tab::Overview, &transcript).to_string();
        assert!(rendered.contains("== Residential Lease Agreement =="));
        assert!(rendered.contains("[overview]"));
        assert!(rendered.contains("$2500"));
        assert!(rendered.contains("3 months rent ($7,500)"));
        assert!(rendered.contains("Risks found: 2 high, 2 medium, 0 low"));
    }

    #[test]
    fn test_dashboard_tab_bar_highlights_active() {
        let pack = pack();
        let transcript = Transcript::new();
        let rendered = DashboardView::new(&pack, Tab::Risks, &transcript).to_string();
        assert!(rendered.contains("[risks]"));
        assert!(!rendered.contains("[overview]"));
    }

    #[test]
    fn test_risks_tab_sorts_high_first() {
        let pack = pack();
        let transcript = Transcript::new();
        let rendered = DashboardView::new(&pack, Tab::Risks, &transcript).to_string();
        let high = rendered.find("[High Risk] Rent Increase Clause").unwrap();
        let medium = rendered.find("[Medium Risk]").unwrap();
        assert!(high < medium);
    }

    #[test]
    fn test_chat_tab_lists_quick_questions() {
        let pack = pack();
        let transcript = Transcript::new();
        let rendered = DashboardView::new(&pack, Tab::Chat, &transcript).to_string();
        assert!(rendered.contains("No questions yet"));
        assert!(rendered.contains("quick 1"));
        assert!(rendered.contains("What happens if I want to move out early?"));
        assert!(rendered.contains("Ask About Rent"));
        assert!(rendered.contains("Clarify Repair"));
    }

    #[test]
    fn test_chat_tab_renders_transcript() {
        let pack = pack();
        let mut transcript = Transcript::new();
        transcript.push_user("Can I cancel my lease?");
        transcript.push_bot("According to your lease...");
        let rendered = DashboardView::new(&pack, Tab::Chat, &transcript).to_string();
        assert!(rendered.contains("You: Can I cancel my lease?"));
        assert!(rendered.contains("Bot: According to your lease..."));
        assert!(!rendered.contains("No questions yet"));
    }

    #[test]
    fn test_summary_tab_shows_score_and_recommendations() {
        let pack = pack();
        let transcript = Transcript::new();
        let rendered = DashboardView::new(&pack, Tab::Summary, &transcript).to_string();
        assert!(rendered.contains("Risk score: 7/10"));
        assert!(rendered.contains("Recommendations:"));
        assert!(rendered.contains("download | share"));
    }

    #[test]
    fn test_clause_detail_badge_capitalization() {
        let pack = pack();
        let clause = pack.clause("entry_rights").unwrap();
        let rendered = ClauseDetailView::new(clause).to_string();
        assert!(rendered.contains("== Landlord Entry Rights ==  [Medium Risk]"));
        assert!(rendered.contains("Original text:"));
        assert!(rendered.contains("In plain language:"));
        assert!(rendered.contains("Why this matters:"));
    }

    #[test]
    fn test_notice_view() {
        let rendered = NoticeView::new("Summary report would be downloaded as PDF.").to_string();
        assert!(rendered.starts_with("Notice: "));
        assert!(rendered.contains("downloaded as PDF"));
    }
}
