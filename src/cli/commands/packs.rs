//! The `packs` command: registry listing and pack validation.

use std::fmt::Write as _;
use std::path::Path;

use crate::cli::args::{OutputFormat, PacksListArgs, PacksShowArgs, PacksValidateArgs};
use crate::config::loader::PackLoader;
use crate::error::{LeaseLensError, PackError, Severity, ValidationIssue};
use crate::packs;

/// Lists the built-in packs.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn list(args: &PacksListArgs) -> Result<(), LeaseLensError> {
    match args.format {
        OutputFormat::Text => {
            for pack in packs::list_packs() {
                println!("{:<24}{}", pack.name, pack.description);
            }
        }
        OutputFormat::Json => {
            let payload: Vec<_> = packs::list_packs()
                .iter()
                .map(|pack| {
                    serde_json::json!({
                        "name": pack.name,
                        "description": pack.description,
                        "category": pack.category,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}

/// Shows one built-in pack's contents summary.
///
/// # Errors
///
/// Returns a usage error for unknown names, with a suggestion when one is
/// close, or a pack error if the embedded YAML fails to load.
pub fn show(args: &PacksShowArgs) -> Result<(), LeaseLensError> {
    let Some(builtin) = packs::find_pack(&args.name) else {
        let mut message = format!("Unknown pack '{}'", args.name);
        if let Some(suggestion) = packs::suggest_pack(&args.name) {
            let _ = write!(message, ". Did you mean '{suggestion}'?");
        }
        return Err(LeaseLensError::Usage(message));
    };

    let loader = PackLoader::with_defaults();
    let result = loader.load_from_str(builtin.yaml, Path::new(builtin.name))?;
    let pack = result.pack;

    println!("{:<16}{}", "Name:", pack.name);
    println!("{:<16}{}", "Title:", pack.title);
    println!("{:<16}{}", "Category:", builtin.category);
    println!("{:<16}{}", "Description:", builtin.description);
    println!();
    println!("{:<16}{}", "Clauses:", pack.clauses.len());
    println!("{:<16}{}", "Canned Q&A:", pack.chat.canned.len());
    println!("{:<16}{}", "Match rules:", pack.chat.rules.len());
    println!("{:<16}{}", "Steps:", pack.analysis.steps.len());
    println!("{:<16}{}", "Samples:", pack.samples.len());
    Ok(())
}

/// Validates pack files without starting a session.
///
/// # Errors
///
/// Returns a pack error for unreadable or invalid files, and in strict
/// mode also when any warnings were found.
pub fn validate(args: &PacksValidateArgs) -> Result<(), LeaseLensError> {
    let loader = PackLoader::with_defaults();
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating pack");
        let result = match loader.load(path) {
            Ok(result) => result,
            Err(PackError::ValidationError { path: origin, errors }) => {
                println!("{}: INVALID ({} error(s))", path.display(), errors.len());
                for issue in &errors {
                    println!("  {issue}");
                }
                return Err(PackError::ValidationError {
                    path: origin,
                    errors,
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        println!(
            "{}: ok ({} warning(s))",
            path.display(),
            result.warnings.len()
        );
        for warning in &result.warnings {
            println!(
                "  warning: {} at {}",
                warning.message,
                warning.location.as_deref().unwrap_or("<pack>")
            );
        }

        if args.strict && !result.warnings.is_empty() {
            let errors = result
                .warnings
                .iter()
                .map(|warning| ValidationIssue {
                    path: warning
                        .location
                        .clone()
                        .unwrap_or_else(|| "<pack>".to_string()),
                    message: warning.message.clone(),
                    severity: Severity::Error,
                })
                .collect();
            return Err(PackError::ValidationError {
                path: path.display().to_string(),
                errors,
            }
            .into());
        }
    }
    Ok(())
}
