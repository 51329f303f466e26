//! # Error Types
//!
//! Error handling for the hash refactoring MCP service.
//! Provides structured error types that can be converted to MCP ErrorData.

use rmcp::model::ErrorData;
use std::fmt;
use std::path::PathBuf;

/// Error types that can occur while resolving, computing or applying a hash refactoring.
///
/// The refactoring engine itself cannot fail; everything here comes from
/// the file and workspace handling around it.
#[derive(Debug)]
pub enum ServiceError {
    /// Internal service error with custom message
    Internal(String),
    /// Tool parameters that are well-formed JSON but unusable
    InvalidParams(String),
    /// I/O error reading/writing files
    Io(std::io::Error),
    /// Error parsing YAML settings files
    SerdeYaml(serde_yaml::Error),
    /// Error parsing JSON data
    SerdeJson(serde_json::Error),
    /// Requested file not found
    FileNotFound(PathBuf),
    /// File larger than the configured limit
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    /// Path resolves outside every workspace root
    PathOutsideRoots(PathBuf),
    /// No single workspace root owns the document, so a relative module path is ambiguous
    AmbiguousWorkspace(PathBuf),
    /// Module path exists but is not a regular file
    ModuleNotAFile(PathBuf),
    /// The document changed since the caller took its snapshot
    StaleSnapshot { expected: String, actual: String },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Internal(msg) => write!(f, "Internal error: {msg}"),
            ServiceError::InvalidParams(msg) => write!(f, "Invalid parameters: {msg}"),
            ServiceError::Io(err) => write!(f, "IO error: {err}"),
            ServiceError::SerdeYaml(err) => write!(f, "YAML parsing error: {err}"),
            ServiceError::SerdeJson(err) => write!(f, "JSON parsing error: {err}"),
            ServiceError::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            ServiceError::FileTooLarge { path, size, limit } => write!(
                f,
                "File too large: {} is {size} bytes (limit {limit})",
                path.display()
            ),
            ServiceError::PathOutsideRoots(path) => {
                write!(f, "Path is outside allowed directories: {}", path.display())
            }
            ServiceError::AmbiguousWorkspace(path) => write!(
                f,
                "It's ambiguous which workspace root the module path refers to for {}. Save the file inside a workspace root first.",
                path.display()
            ),
            ServiceError::ModuleNotAFile(path) => {
                write!(f, "Module path is not a regular file: {}", path.display())
            }
            ServiceError::StaleSnapshot { expected, actual } => write!(
                f,
                "Document changed since it was read (expected {expected}, found {actual})"
            ),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io(err)
    }
}

impl From<serde_yaml::Error> for ServiceError {
    fn from(err: serde_yaml::Error) -> Self {
        ServiceError::SerdeYaml(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerdeJson(err)
    }
}

impl From<ServiceError> for ErrorData {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidParams(_)
            | ServiceError::PathOutsideRoots(_)
            | ServiceError::AmbiguousWorkspace(_)
            | ServiceError::StaleSnapshot { .. } => ErrorData::invalid_params(err.to_string(), None),
            _ => ErrorData::internal_error(err.to_string(), None),
        }
    }
}
