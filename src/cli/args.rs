//! CLI argument definitions.
//!
//! All Clap derive structs for `LeaseLens` command-line parsing. A bare
//! `leaselens` invocation behaves like `leaselens run`, so the run options
//! are also flattened into the root parser.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;
use crate::packs::DEFAULT_PACK;

// ============================================================================
// Root CLI
// ============================================================================

/// Interactive lease analysis demo for the terminal.
#[derive(Parser, Debug)]
#[command(name = "leaselens", author, version, about)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to execute; omitted means `run`.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Options for the implicit `run` when no subcommand is given.
    #[command(flatten)]
    pub run: RunArgs,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "LEASELENS_COLOR")]
    pub color: ColorChoice,

    /// Log line format.
    #[arg(long, default_value = "human", global = true, value_name = "FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive session (the default).
    Run(RunArgs),

    /// Match one question against a pack's canned table and print the answer.
    Ask(AskArgs),

    /// Inspect and validate document packs.
    Packs(PacksCommand),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Run Command
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Built-in pack name or path to a pack YAML file.
    #[arg(short, long, default_value = DEFAULT_PACK, env = "LEASELENS_PACK")]
    pub pack: String,

    /// Write the JSONL event stream to this file ('-' for stderr).
    #[arg(long, value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// Override the pack's delay between analysis steps (e.g. "250ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub step_interval: Option<Duration>,

    /// Override the pack's delay before analysis completes.
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub finalize_delay: Option<Duration>,

    /// Override the pack's chat reply delay.
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub reply_delay: Option<Duration>,

    /// Skip the greeting banner.
    #[arg(long)]
    pub no_banner: bool,
}

// ============================================================================
// Ask Command
// ============================================================================

/// Arguments for `ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question, as free text.
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,

    /// Built-in pack name or path to a pack YAML file.
    #[arg(short, long, default_value = DEFAULT_PACK, env = "LEASELENS_PACK")]
    pub pack: String,
}

// ============================================================================
// Packs Command
// ============================================================================

/// Pack registry and validation commands.
#[derive(Args, Debug)]
pub struct PacksCommand {
    /// Packs subcommand.
    #[command(subcommand)]
    pub subcommand: PacksSubcommand,
}

/// Packs subcommands.
#[derive(Subcommand, Debug)]
pub enum PacksSubcommand {
    /// List the built-in packs.
    List(PacksListArgs),

    /// Show one built-in pack's contents summary.
    Show(PacksShowArgs),

    /// Validate pack files without starting a session.
    Validate(PacksValidateArgs),
}

/// Arguments for `packs list`.
#[derive(Args, Debug)]
pub struct PacksListArgs {
    /// Output format.
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for `packs show`.
#[derive(Args, Debug)]
pub struct PacksShowArgs {
    /// Built-in pack name.
    pub name: String,
}

/// Arguments for `packs validate`.
#[derive(Args, Debug)]
pub struct PacksValidateArgs {
    /// Pack files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Version Command
// ============================================================================

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text.
    #[default]
    Text,
    /// JSON.
    Json,
}

// ============================================================================
// Tests
// ============================================================================
