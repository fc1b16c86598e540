//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod ask;
pub mod packs;
pub mod run;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, PacksSubcommand};
use crate::error::LeaseLensError;

/// Dispatches a parsed CLI invocation to the appropriate command handler.
///
/// A missing subcommand runs the interactive session with the flags parsed
/// at the top level.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), LeaseLensError> {
    match cli.command {
        None => run::run(&cli.run, cancel).await,
        Some(Commands::Run(args)) => run::run(&args, cancel).await,
        Some(Commands::Ask(args)) => ask::run(&args),
        Some(Commands::Packs(cmd)) => match cmd.subcommand {
            PacksSubcommand::List(args) => packs::list(&args),
            PacksSubcommand::Show(args) => packs::show(&args),
            PacksSubcommand::Validate(args) => packs::validate(&args),
        },
        Some(Commands::Version(args)) => {
            version::run(&args);
            Ok(())
        }
    }
}
