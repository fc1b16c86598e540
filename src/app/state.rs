//! Session view state.
//!
//! Tracks which section and tab are showing, which document is loaded,
//! and whether a clause detail is open. Mutations follow the demo script:
//! guards fail silently instead of erroring.

use std::sync::Arc;

use crate::config::schema::{Clause, DocumentPack};

/// Top-level screen of the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Landing screen.
    Home,
    /// Upload screen with dropzone and sample documents.
    Upload,
    /// Loading screen shown while analysis runs.
    Progress,
    /// Results dashboard with tabs.
    Dashboard,
}

impl Section {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Upload => "upload",
            Self::Progress => "progress",
            Self::Dashboard => "dashboard",
        }
    }

    /// Parses a section name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Self::Home),
            "upload" => Some(Self::Upload),
            "progress" => Some(Self::Progress),
            "dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Document profile and risk summary.
    Overview,
    /// Plain-language clause rewrites.
    Simplified,
    /// Clause risk breakdown.
    Risks,
    /// Canned question chat.
    Chat,
    /// Risk score and recommendations.
    Summary,
}

impl Tab {
    /// All tabs in display order; digits 1-5 map onto this.
    pub const ALL: [Self; 5] = [
        Self::Overview,
        Self::Simplified,
        Self::Risks,
        Self::Chat,
        Self::Summary,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Simplified => "simplified",
            Self::Risks => "risks",
            Self::Chat => "chat",
            Self::Summary => "summary",
        }
    }

    /// Parses a tab name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.name() == name)
    }

    /// Maps a digit key to a tab: '1' is overview, '5' is summary.
    #[must_use]
    pub fn from_digit(key: char) -> Option<Self> {
        let index = key.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mutable view state for one session.
///
/// Owned by the session loop; the analysis engine reports progress over a
/// channel instead of touching this directly.
#[derive(Debug)]
pub struct AppState {
    section: Section,
    tab: Tab,
    document: Option<Arc<DocumentPack>>,
    modal_clause: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates the initial state: home section, overview tab, nothing loaded.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            section: Section::Home,
            tab: Tab::Overview,
            document: None,
            modal_clause: None,
        }
    }

    /// Current section.
    #[must_use]
    pub const fn section(&self) -> Section {
        self.section
    }

    /// Current dashboard tab.
    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    /// The loaded document, if analysis has completed at least once.
    #[must_use]
    pub const fn document(&self) -> Option<&Arc<DocumentPack>> {
        self.document.as_ref()
    }

    /// Switches section.
    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    /// Switches dashboard tab.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Marks the pack's document as loaded.
    pub fn load_document(&mut self, pack: Arc<DocumentPack>) {
        self.document = Some(pack);
    }

    /// Opens the clause detail for `id`.
    ///
    /// Silently refuses when no document is loaded or the id is unknown;
    /// returns whether the detail opened. An already-open detail is
    /// replaced.
    pub fn open_clause(&mut self, id: &str) -> bool {
        let Some(document) = &self.document else {
            return false;
        };
        if document.clause(id).is_none() {
            return false;
        }
        self.modal_clause = Some(id.to_string());
        true
    }

    /// Closes the clause detail.
    ///
    /// Returns whether one was open.
    pub fn close_modal(&mut self) -> bool {
        self.modal_clause.take().is_some()
    }

    /// Whether a clause detail is open.
    #[must_use]
    pub const fn is_modal_open(&self) -> bool {
        self.modal_clause.is_some()
    }

    /// The clause behind the open detail, resolved against the document.
    #[must_use]
    pub fn modal_clause(&self) -> Option<&Clause> {
        let document = self.document.as_ref()?;
        document.clause(self.modal_clause.as_deref()?)
    }

    /// Id of the open clause detail, if any.
    #[must_use]
    pub fn modal_clause_id(&self) -> Option<&str> {
        self.modal_clause.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::PackLoader;
    use crate::packs;
    use std::path::Path;

    fn loaded_pack() -> Arc<DocumentPack> {
        let loader = PackLoader::with_defaults();
        let builtin = packs::find_pack(packs::DEFAULT_PACK).unwrap();
        loader
            .load_from_str(builtin.yaml, Path::new("test"))
            .unwrap()
            .pack
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::new();
        assert_eq!(state.section(), Section::Home);
        assert_eq!(state.tab(), Tab::Overview);
        assert!(state.document().is_none());
        assert!(!state.is_modal_open());
    }

    #[test]
    fn test_section_and_tab_switch() {
        let mut state = AppState::new();
        state.set_section(Section::Dashboard);
        state.set_tab(Tab::Risks);
        assert_eq!(state.section(), Section::Dashboard);
        assert_eq!(state.tab(), Tab::Risks);
    }

    #[test]
    fn test_open_clause_without_document_is_refused() {
        let mut state = AppState::new();
        assert!(!state.open_clause("rent_increase"));
        assert!(!state.is_modal_open());
    }

    #[test]
    fn test_open_unknown_clause_is_refused() {
        let mut state = AppState::new();
        state.load_document(loaded_pack());
        assert!(!state.open_clause("nonexistent"));
        assert!(!state.is_modal_open());
    }

    #[test]
    fn test_open_and_close_clause() {
        let mut state = AppState::new();
        state.load_document(loaded_pack());

        assert!(state.open_clause("rent_increase"));
        assert!(state.is_modal_open());
        let clause = state.modal_clause().unwrap();
        assert_eq!(clause.display_title(), "Rent Increase Clause");

        assert!(state.close_modal());
        assert!(!state.is_modal_open());
        assert!(state.modal_clause().is_none());
    }

    #[test]
    fn test_close_modal_when_closed_reports_false() {
        let mut state = AppState::new();
        assert!(!state.close_modal());
    }

    #[test]
    fn test_open_replaces_open_detail() {
        let mut state = AppState::new();
        state.load_document(loaded_pack());
        assert!(state.open_clause("rent_increase"));
        assert!(state.open_clause("guest_policy"));
        assert_eq!(
            state.modal_clause().unwrap().display_title(),
            "Guest Policy"
        );
    }

    #[test]
    fn test_tab_digit_mapping() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Overview));
        assert_eq!(Tab::from_digit('2'), Some(Tab::Simplified));
        assert_eq!(Tab::from_digit('3'), Some(Tab::Risks));
        assert_eq!(Tab::from_digit('4'), Some(Tab::Chat));
        assert_eq!(Tab::from_digit('5'), Some(Tab::Summary));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('6'), None);
        assert_eq!(Tab::from_digit('x'), None);
    }

    #[test]
    fn test_names_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_name(tab.name()), Some(tab));
        }
        for section in [
            Section::Home,
            Section::Upload,
            Section::Progress,
            Section::Dashboard,
        ] {
            assert_eq!(Section::from_name(section.name()), Some(section));
        }
        assert_eq!(Tab::from_name("unknown"), None);
        assert_eq!(Section::from_name("unknown"), None);
    }
}
