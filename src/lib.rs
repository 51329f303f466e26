pub mod apply;
pub mod config;
pub mod errors;
pub mod hash_refactor_service;
pub mod refactoring;
pub mod response_formatter;
pub mod selection;
pub mod settings;
pub mod text;
pub mod tool_router;
pub mod tools;
pub mod types;
pub mod workspace;

// Re-export commonly used types
pub use refactoring::{Edit, RefactorEdits, RefactorOptions, refactor_hashes};
pub use types::*;
