//! Keyword routing for the clause chat.
//!
//! Compiles a pack's keyword rules into per-question trigger lists and
//! routes free-form input to the first canned entry whose triggers hit.

use crate::config::schema::ChatConfig;

/// A compiled question matcher ready for evaluation.
///
/// Built once per loaded pack. Matching is case-insensitive substring
/// containment; canned entries are tried in declaration order and the
/// first hit wins.
#[derive(Debug)]
pub struct QuestionMatcher {
    entries: Vec<EntryTriggers>,
}

/// Lowercased triggers that route input to one canned entry.
#[derive(Debug)]
struct EntryTriggers {
    triggers: Vec<String>,
}

impl QuestionMatcher {
    /// Compiles the chat config into an evaluatable matcher.
    ///
    /// For each canned entry, keeps the trigger of every rule whose
    /// requirement appears in that entry's question. Rules whose
    /// requirement matches no canned question drop out here; the
    /// validator flags those as warnings at load time.
    #[must_use]
    pub fn compile(chat: &ChatConfig) -> Self {
        let entries = chat
            .canned
            .iter()
            .map(|qa| {
                let question = qa.question.to_lowercase();
                let triggers = chat
                    .rules
                    .iter()
                    .filter(|rule| question.contains(&rule.requires.to_lowercase()))
                    .map(|rule| rule.trigger.to_lowercase())
                    .collect();
                EntryTriggers { triggers }
            })
            .collect();
        Self { entries }
    }

    /// Routes input to a canned entry.
    ///
    /// Returns the index of the first canned entry (in declaration order)
    /// reached by any rule, or `None` when the fallback answer applies.
    /// Containment is literal: "current" contains "rent".
    #[must_use]
    pub fn match_question(&self, input: &str) -> Option<usize> {
        let input = input.to_lowercase();
        self.entries
            .iter()
            .position(|entry| entry.triggers.iter().any(|t| input.contains(t.as_str())))
    }
}
