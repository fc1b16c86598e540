//! The `ask` command: one-shot question matching.
//!
//! Loads a pack, runs the question matcher once, and prints the canned or
//! fallback answer. The same matcher drives the interactive chat tab.

use crate::chat::QuestionMatcher;
use crate::cli::args::AskArgs;
use crate::config::loader::PackLoader;
use crate::error::LeaseLensError;
use crate::packs;

/// Matches one question against the pack's canned table and prints the
/// answer.
///
/// # Errors
///
/// Returns an error when the pack cannot be loaded.
pub fn run(args: &AskArgs) -> Result<(), LeaseLensError> {
    let answer = answer_for(&args.pack, &args.question.join(" "))?;
    println!("{answer}");
    Ok(())
}

fn answer_for(pack_spec: &str, question: &str) -> Result<String, LeaseLensError> {
    let loader = PackLoader::with_defaults();
    let result = packs::resolve(pack_spec, &loader)?;
    let pack = result.pack;

    let matcher = QuestionMatcher::compile(&pack.chat);
    let answer = matcher
        .match_question(question)
        .and_then(|index| pack.chat.canned.get(index))
        .map_or_else(|| pack.chat.fallback.clone(), |entry| entry.answer.clone());
    Ok(answer)
}
