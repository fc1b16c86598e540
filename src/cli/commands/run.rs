//! The `run` command: the interactive session.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::RunArgs;
use crate::config::loader::PackLoader;
use crate::console::StdioConsole;
use crate::error::LeaseLensError;
use crate::observability::EventEmitter;
use crate::packs;
use crate::session::{Session, SessionOptions};

/// Starts the interactive session over the resolved pack.
///
/// # Errors
///
/// Returns an error when the pack cannot be loaded or console I/O fails.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), LeaseLensError> {
    let loader = PackLoader::with_defaults();
    let load_result = packs::resolve(&args.pack, &loader)?;
    for warning in &load_result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<pack>"),
            "{}",
            warning.message
        );
    }

    let session = Session::new(SessionOptions {
        pack: load_result.pack,
        pack_name: pack_display_name(&args.pack),
        console: Arc::new(StdioConsole::new()),
        event_emitter: emitter_for(args.events.as_deref())?,
        show_banner: !args.no_banner,
        step_interval: args.step_interval,
        finalize_delay: args.finalize_delay,
        reply_delay: args.reply_delay,
        cancel,
    });
    session.run().await
}

/// Picks the event sink: none by default, stderr for `-`, else a file.
fn emitter_for(events: Option<&Path>) -> std::io::Result<EventEmitter> {
    match events {
        None => Ok(EventEmitter::noop()),
        Some(path) if path == Path::new("-") => Ok(EventEmitter::stderr()),
        Some(path) => EventEmitter::from_file(path),
    }
}

/// Short pack name for events and logs: builtin names as-is, files by stem.
fn pack_display_name(name_or_path: &str) -> String {
    if packs::find_pack(name_or_path).is_some() {
        return name_or_path.to_string();
    }
    Path::new(name_or_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map_or_else(|| name_or_path.to_string(), str::to_string)
}
