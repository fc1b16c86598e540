//! Built-in document packs
//!
//! Curated demo packs embedded in the binary at compile time. Enables
//! zero-configuration usage: `leaselens run` loads the rental pack without
//! any file on disk.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::loader::{LoadResult, PackLoader};
use crate::error::LeaseLensError;

/// Name of the pack loaded when `--pack` is not given.
pub const DEFAULT_PACK: &str = "rental-agreement";

// ============================================================================
// Types
// ============================================================================

/// A built-in pack embedded in the binary.
///
/// Each pack is a self-contained YAML document bundling a sample document,
/// clause annotations, and the canned chat table.
pub struct BuiltinPack {
    /// Unique identifier (kebab-case, e.g., "rental-agreement").
    pub name: &'static str,

    /// Short human-readable description.
    pub description: &'static str,

    /// Pack category (e.g., "rental").
    pub category: &'static str,

    /// Raw YAML content (embedded at compile time).
    pub yaml: &'static str,
}

// ============================================================================
// Registry
// ============================================================================

/// Global registry of all built-in packs.
static BUILTIN_PACKS: LazyLock<Vec<BuiltinPack>> = LazyLock::new(|| {
    vec![BuiltinPack {
        name: "rental-agreement",
        description: "Annotated sample lease with clause risk ratings and canned chat",
        category: "rental",
        yaml: include_str!("../../packs/rental-agreement.yaml"),
    }]
});

// ============================================================================
// Public API
// ============================================================================

/// Look up a built-in pack by exact name.
#[must_use]
pub fn find_pack(name: &str) -> Option<&'static BuiltinPack> {
    BUILTIN_PACKS.iter().find(|p| p.name == name)
}

/// List all built-in packs in registry order.
#[must_use]
pub fn list_packs() -> Vec<&'static BuiltinPack> {
    BUILTIN_PACKS.iter().collect()
}

/// Suggest a similar pack name for typo correction.
///
/// Returns the closest match if its Damerau-Levenshtein distance is <= 3.
#[must_use]
pub fn suggest_pack(input: &str) -> Option<String> {
    BUILTIN_PACKS
        .iter()
        .map(|p| (p.name, strsim::damerau_levenshtein(input, p.name)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}

/// Returns all pack names in registry order.
#[must_use]
pub fn list_pack_names() -> Vec<&'static str> {
    BUILTIN_PACKS.iter().map(|p| p.name).collect()
}

/// Resolves a `--pack` value to a loaded pack.
///
/// Built-in names are checked first; anything that looks like a file path
/// goes through the file loader. Unknown names get a did-you-mean message.
///
/// # Errors
///
/// Returns a pack error for unreadable or invalid files, or a usage error
/// for unknown built-in names.
pub fn resolve(name_or_path: &str, loader: &PackLoader) -> Result<LoadResult, LeaseLensError> {
    if let Some(builtin) = find_pack(name_or_path) {
        let origin = format!("builtin:{}", builtin.name);
        return Ok(loader.load_from_str(builtin.yaml, Path::new(&origin))?);
    }

    let path = Path::new(name_or_path);
    if path.exists()
        || name_or_path.contains(std::path::MAIN_SEPARATOR)
        || has_yaml_extension(path)
    {
        return Ok(loader.load(path)?);
    }

    let mut message = format!("Unknown pack '{name_or_path}'");
    if let Some(suggestion) = suggest_pack(name_or_path) {
        let _ = write!(message, "\n\nDid you mean '{suggestion}'?");
    }
    message.push_str("\n\nAvailable packs:");
    for pack in list_packs() {
        let _ = write!(message, "\n  {:<24}{}", pack.name, pack.description);
    }
    message.push_str("\n\nUse 'leaselens packs list' for full details.");
    Err(LeaseLensError::Usage(message))
}

fn has_yaml_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

// ============================================================================
// Tests
// ============================================================================
