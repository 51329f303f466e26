//! # Hash Refactoring
//!
//! Converts Lua string literals into named `hash(...)` constants, either as
//! local declarations in the edited script or as members of a shared hash
//! module, and rewrites every occurrence to the new name.

pub mod engine;
pub mod literal;
pub mod occurrences;
pub mod placement;
pub mod types;

pub use engine::{build_requests, refactor_hashes};
pub use types::{Edit, HashRequest, RefactorEdits, RefactorOptions};
