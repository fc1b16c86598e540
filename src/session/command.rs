//! Session command parsing.
//!
//! Each line the user types maps to one [`SessionCommand`], the terminal
//! stand-ins for the original point-and-click trigger surface. Lines are
//! tokenized with `shlex` so quoted arguments (paths with spaces) work;
//! `ask` keeps its raw tail instead so apostrophes in questions survive.

use std::fmt;

use strsim::damerau_levenshtein;

/// All command words, including aliases, for did-you-mean suggestions.
const COMMAND_WORDS: &[&str] = &[
    "demo", "upload", "pick", "drop", "sample", "tab", "ask", "quick", "clause", "esc", "close",
    "download", "share", "home", "goto", "help", "quit", "exit",
];

/// Help screen listing every session command.
pub const HELP_TEXT: &str = "\
Commands:
  demo                Run the sample analysis
  upload              Open the upload screen
  pick <path>         Choose a document to analyze
  drop <path>         Drop a document onto the analyzer
  sample <id>         Pick a sample document
  tab <name>          Switch dashboard tab (digits 1-5 work too)
  ask <question>      Ask about the analyzed document
  quick <n>           Ask a quick question by number
  clause <id>         Open a clause in detail
  esc                 Close the clause detail
  download            Download the full report
  share               Share the analysis
  home                Back to the home screen
  goto <section>      Jump to a section (home, upload, progress, dashboard)
  help                Show this help
  quit                Leave";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start the demo analysis.
    Demo,
    /// Show the upload screen.
    Upload,
    /// Choose a document file (presence only, never read).
    Pick(String),
    /// Drop a document file (presence only, never read).
    Drop(String),
    /// Pick a sample document by id.
    Sample(String),
    /// Switch the dashboard tab by name.
    Tab(String),
    /// Switch the dashboard tab by digit shortcut (`'1'`..=`'5'`).
    Digit(char),
    /// Submit a chat question.
    Ask(String),
    /// Submit a quick question by its listed number.
    Quick(usize),
    /// Open a clause detail view.
    Clause(String),
    /// Dismiss the open clause detail view.
    CloseModal,
    /// Show the download placeholder notice.
    Download,
    /// Show the share placeholder notice.
    Share,
    /// Return to the home screen.
    Home,
    /// Jump to a section by name.
    Goto(String),
    /// Show the help screen.
    Help,
    /// End the session.
    Quit,
}

impl SessionCommand {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for unknown commands (with a did-you-mean
    /// suggestion where one is close enough), missing arguments, malformed
    /// numbers, and unbalanced quotes.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        // `ask` takes the rest of the line verbatim; shlex would choke on
        // apostrophes in free-text questions.
        let (head, tail) = match trimmed.split_once(char::is_whitespace) {
            Some((head, tail)) => (head, tail.trim()),
            None => (trimmed, ""),
        };
        if head.eq_ignore_ascii_case("ask") {
            if tail.is_empty() {
                return Err(ParseError::MissingArgument {
                    usage: "ask <question>",
                });
            }
            return Ok(Some(Self::Ask(tail.to_string())));
        }

        let Some(tokens) = shlex::split(trimmed) else {
            return Err(ParseError::UnbalancedQuote);
        };
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(None);
        };
        let word = first.to_ascii_lowercase();

        if word.len() == 1 && rest.is_empty() {
            if let Some(digit @ '1'..='5') = word.chars().next() {
                return Ok(Some(Self::Digit(digit)));
            }
        }

        match word.as_str() {
            "demo" => Ok(Some(Self::Demo)),
            "upload" => Ok(Some(Self::Upload)),
            "pick" => joined_arg(rest, "pick <path>").map(|p| Some(Self::Pick(p))),
            "drop" => joined_arg(rest, "drop <path>").map(|p| Some(Self::Drop(p))),
            "sample" => first_arg(rest, "sample <id>").map(|id| Some(Self::Sample(id))),
            "tab" => first_arg(rest, "tab <name>").map(|name| Some(Self::Tab(name))),
            "quick" => {
                let raw = first_arg(rest, "quick <n>")?;
                raw.parse::<usize>()
                    .map(|n| Some(Self::Quick(n)))
                    .map_err(|_| ParseError::BadNumber { raw })
            }
            "clause" => first_arg(rest, "clause <id>").map(|id| Some(Self::Clause(id))),
            "esc" | "close" => Ok(Some(Self::CloseModal)),
            "download" => Ok(Some(Self::Download)),
            "share" => Ok(Some(Self::Share)),
            "home" => Ok(Some(Self::Home)),
            "goto" => first_arg(rest, "goto <section>").map(|name| Some(Self::Goto(name))),
            "help" | "?" => Ok(Some(Self::Help)),
            "quit" | "exit" => Ok(Some(Self::Quit)),
            _ => Err(ParseError::Unknown {
                input: first.clone(),
                suggestion: suggest(&word),
            }),
        }
    }

    /// Stable action-kind name, used for per-kind session counters.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Upload => "upload",
            Self::Pick(_) => "pick",
            Self::Drop(_) => "drop",
            Self::Sample(_) => "sample",
            Self::Tab(_) => "tab",
            Self::Digit(_) => "digit",
            Self::Ask(_) => "ask",
            Self::Quick(_) => "quick",
            Self::Clause(_) => "clause",
            Self::CloseModal => "close",
            Self::Download => "download",
            Self::Share => "share",
            Self::Home => "home",
            Self::Goto(_) => "goto",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

/// Why a line failed to parse. The `Display` text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The command word is not recognized.
    Unknown {
        /// The word as typed.
        input: String,
        /// Closest known command, if any is within editing distance.
        suggestion: Option<String>,
    },
    /// The command needs an argument that was not given.
    MissingArgument {
        /// Usage line to show.
        usage: &'static str,
    },
    /// `quick` was given something that is not a number.
    BadNumber {
        /// The argument as typed.
        raw: String,
    },
    /// The line has an unmatched quote.
    UnbalancedQuote,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { input, suggestion } => {
                write!(f, "Unknown command '{input}'.")?;
                if let Some(suggestion) = suggestion {
                    write!(f, " Did you mean '{suggestion}'?")?;
                }
                write!(f, " Type 'help' for commands.")
            }
            Self::MissingArgument { usage } => write!(f, "Usage: {usage}"),
            Self::BadNumber { raw } => write!(f, "'{raw}' is not a number. Usage: quick <n>"),
            Self::UnbalancedQuote => write!(f, "Unmatched quote in command."),
        }
    }
}

impl std::error::Error for ParseError {}

/// First argument token, or a usage error when none was given.
fn first_arg(rest: &[String], usage: &'static str) -> Result<String, ParseError> {
    rest.first()
        .cloned()
        .ok_or(ParseError::MissingArgument { usage })
}

/// All argument tokens joined, so unquoted paths with spaces still work.
fn joined_arg(rest: &[String], usage: &'static str) -> Result<String, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument { usage });
    }
    Ok(rest.join(" "))
}

/// Closest command word within Damerau-Levenshtein distance 2.
fn suggest(input: &str) -> Option<String> {
    COMMAND_WORDS
        .iter()
        .map(|candidate| (damerau_levenshtein(input, candidate), *candidate))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}
