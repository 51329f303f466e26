//! Workspace roots, module path resolution and file snapshots.

use crate::errors::ServiceError;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Text of a file as read before computing edits.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    pub path: PathBuf,
    pub text: String,
    /// False when the file does not exist yet; `text` is then empty
    pub exists: bool,
}

impl FileSnapshot {
    pub fn hash(&self) -> String {
        content_hash(&self.text)
    }
}

/// `sha256:<hex>` fingerprint of a text snapshot.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

fn canonical_roots(root_directories: &[PathBuf]) -> Vec<PathBuf> {
    root_directories
        .iter()
        .filter_map(|root| root.canonicalize().ok())
        .collect()
}

/// Canonical path of an existing document.
pub fn canonical_document_path(path: &Path) -> Result<PathBuf, ServiceError> {
    path.canonicalize()
        .map_err(|_| ServiceError::FileNotFound(path.to_path_buf()))
}

/// Validates that a path is within one of the allowed root directories
pub fn ensure_within_roots(path: &Path, root_directories: &[PathBuf]) -> Result<(), ServiceError> {
    if canonical_roots(root_directories)
        .iter()
        .any(|root| path.starts_with(root))
    {
        Ok(())
    } else {
        Err(ServiceError::PathOutsideRoots(path.to_path_buf()))
    }
}

/// The workspace root a document belongs to.
///
/// The deepest root containing the document wins. A document outside every
/// root falls back to the only root, if there is exactly one.
pub fn owning_root(document: &Path, root_directories: &[PathBuf]) -> Result<PathBuf, ServiceError> {
    let roots = canonical_roots(root_directories);
    let containing = roots
        .iter()
        .filter(|root| document.starts_with(root))
        .max_by_key(|root| root.components().count());

    match (containing, roots.as_slice()) {
        (Some(root), _) => Ok(root.clone()),
        (None, [only]) => Ok(only.clone()),
        (None, _) => Err(ServiceError::AmbiguousWorkspace(document.to_path_buf())),
    }
}

/// Absolute path of the configured module for `document`.
///
/// The module path is relative to the owning workspace root and may not
/// climb out of it.
pub fn resolve_module_path(
    document: &Path,
    module_path: &str,
    root_directories: &[PathBuf],
) -> Result<PathBuf, ServiceError> {
    let relative = Path::new(module_path);
    if relative.is_absolute() {
        return Err(ServiceError::InvalidParams(format!(
            "module path must be relative to the workspace root: {module_path}"
        )));
    }
    if relative
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(ServiceError::InvalidParams(format!(
            "module path may not contain '..': {module_path}"
        )));
    }

    let root = owning_root(document, root_directories)?;
    let resolved: PathBuf = root
        .join(relative)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    debug!(module = %resolved.display(), root = %root.display(), "resolved module path");
    Ok(resolved)
}

/// Read a document, refusing files over `max_file_size`.
pub fn read_document(path: &Path, max_file_size: u64) -> Result<FileSnapshot, ServiceError> {
    let metadata = fs::metadata(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => ServiceError::FileNotFound(path.to_path_buf()),
        _ => ServiceError::Io(err),
    })?;
    if metadata.len() > max_file_size {
        return Err(ServiceError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: max_file_size,
        });
    }

    Ok(FileSnapshot {
        path: path.to_path_buf(),
        text: fs::read_to_string(path)?,
        exists: true,
    })
}

/// Read the module file. Only "not found" counts as absent; any other I/O
/// failure is returned.
pub fn read_module(path: &Path) -> Result<FileSnapshot, ServiceError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(FileSnapshot {
            path: path.to_path_buf(),
            text: fs::read_to_string(path)?,
            exists: true,
        }),
        Ok(_) => Err(ServiceError::ModuleNotAFile(path.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(module = %path.display(), "module file does not exist yet");
            Ok(FileSnapshot {
                path: path.to_path_buf(),
                text: String::new(),
                exists: false,
            })
        }
        Err(err) => Err(ServiceError::Io(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_hash_format() {
        let hash = content_hash("local x = 1\n");
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), "sha256:".len() + 64);
        assert_eq!(hash, content_hash("local x = 1\n"));
        assert_ne!(hash, content_hash("local x = 2\n"));
    }

    #[test]
    fn test_owning_root_prefers_deepest() {
        let temp_dir = TempDir::new().unwrap();
        let outer = temp_dir.path().canonicalize().unwrap();
        let inner = outer.join("game");
        fs::create_dir_all(inner.join("main")).unwrap();
        let document = inner.join("main").join("player.script");

        let roots = vec![outer.clone(), inner.clone()];
        assert_eq!(owning_root(&document, &roots).unwrap(), inner);
    }

    #[test]
    fn test_owning_root_single_root_fallback() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let document = elsewhere.path().canonicalize().unwrap().join("a.lua");

        let roots = vec![root.path().to_path_buf()];
        assert_eq!(
            owning_root(&document, &roots).unwrap(),
            root.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_owning_root_ambiguous() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let document = elsewhere.path().canonicalize().unwrap().join("a.lua");

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert!(matches!(
            owning_root(&document, &roots),
            Err(ServiceError::AmbiguousWorkspace(_))
        ));
    }

    #[test]
    fn test_resolve_module_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let document = root.join("main").join("player.script");
        let roots = vec![root.clone()];

        assert_eq!(
            resolve_module_path(&document, "./main/hashes.lua", &roots).unwrap(),
            root.join("main").join("hashes.lua")
        );
        assert!(matches!(
            resolve_module_path(&document, "../hashes.lua", &roots),
            Err(ServiceError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_read_module_missing_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = read_module(&temp_dir.path().join("hashes.lua")).unwrap();
        assert!(!snapshot.exists);
        assert!(snapshot.text.is_empty());
    }

    #[test]
    fn test_read_module_directory_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            read_module(temp_dir.path()),
            Err(ServiceError::ModuleNotAFile(_))
        ));
    }

    #[test]
    fn test_read_document_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.lua");
        fs::write(&path, "x".repeat(64)).unwrap();

        assert!(matches!(
            read_document(&path, 16),
            Err(ServiceError::FileTooLarge { size: 64, limit: 16, .. })
        ));
        assert_eq!(read_document(&path, 1024).unwrap().text.len(), 64);
        assert!(matches!(
            read_document(&temp_dir.path().join("missing.lua"), 1024),
            Err(ServiceError::FileNotFound(_))
        ));
    }
}
