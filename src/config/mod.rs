//! Document pack configuration
//!
//! Loads and validates `LeaseLens` document packs: the YAML bundles of
//! sample document, clause annotations, canned chat table, and demo timing
//! that a session runs against.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{LoadResult, LoadWarning, PackLimits, PackLoader};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
