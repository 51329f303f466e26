//! # Edit Application
//!
//! Applies engine edits to their snapshots and writes the results. All
//! offsets of one edit list refer to the same original text; same-offset
//! insertions keep the order they were emitted in.

use crate::errors::ServiceError;
use crate::refactoring::Edit;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Apply `edits` to `text`, returning the new text.
///
/// Fails if an edit lies outside the text, splits a character, or overlaps
/// another edit.
pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String, ServiceError> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    // Stable: same-offset insertions stay in emission order, and an insertion
    // lands before a replacement starting at the same offset.
    ordered.sort_by_key(|edit| (edit.start(), !edit.is_insert()));

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;

    for edit in ordered {
        let (start, end) = (edit.start(), edit.end());
        if start < cursor {
            return Err(ServiceError::Internal(format!(
                "overlapping edits at offset {start}"
            )));
        }
        if start > end || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(ServiceError::Internal(format!(
                "edit {start}..{end} is not a valid range of a {} byte text",
                text.len()
            )));
        }
        result.push_str(&text[cursor..start]);
        result.push_str(edit.text());
        cursor = end;
    }

    result.push_str(&text[cursor..]);
    Ok(result)
}

/// Replace `path` with `contents` via a temporary file in the same directory.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), ServiceError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| ServiceError::Io(err.error))?;
    Ok(())
}

/// One file to be written as part of a [`commit`].
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub contents: String,
    /// Contents before the write; `None` if the file is being created
    pub previous: Option<String>,
}

/// Write every file or none of them.
///
/// Files are written in order. If one fails, the files already written are
/// restored to their previous contents, or removed if they were created.
pub fn commit(writes: &[PendingWrite]) -> Result<(), ServiceError> {
    for (index, write) in writes.iter().enumerate() {
        if let Err(err) = write_atomically(&write.path, &write.contents) {
            warn!(path = %write.path.display(), error = %err, "write failed, rolling back");
            for done in writes[..index].iter().rev() {
                rollback(done);
            }
            return Err(err);
        }
        debug!(path = %write.path.display(), bytes = write.contents.len(), "wrote file");
    }
    Ok(())
}

fn rollback(write: &PendingWrite) {
    let restored = match &write.previous {
        Some(previous) => write_atomically(&write.path, previous),
        None => fs::remove_file(&write.path).map_err(ServiceError::from),
    };
    if let Err(err) = restored {
        warn!(path = %write.path.display(), error = %err, "rollback failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_insert_and_replace() {
        let text = "print(\"a\")";
        let edits = vec![
            Edit::insert("local h_a = hash(\"a\")\n\n", 0),
            Edit::replace("h_a", 6, 9),
        ];
        assert_eq!(
            apply_edits(text, &edits).unwrap(),
            "local h_a = hash(\"a\")\n\nprint(h_a)"
        );
    }

    #[test]
    fn test_same_offset_inserts_keep_order() {
        let edits = vec![
            Edit::insert("local M = {}\n\n", 0),
            Edit::insert("M.a = hash(\"a\")\n", 0),
            Edit::insert("M.b = hash(\"b\")\n", 0),
            Edit::insert("\nreturn M\n", 0),
        ];
        assert_eq!(
            apply_edits("", &edits).unwrap(),
            "local M = {}\n\nM.a = hash(\"a\")\nM.b = hash(\"b\")\n\nreturn M\n"
        );
    }

    #[test]
    fn test_insert_before_replacement_at_same_offset() {
        let edits = vec![Edit::replace("X", 0, 1), Edit::insert(">", 0)];
        assert_eq!(apply_edits("ab", &edits).unwrap(), ">Xb");
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let edits = vec![Edit::replace("x", 0, 4), Edit::replace("y", 2, 6)];
        assert!(apply_edits("abcdefgh", &edits).is_err());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(apply_edits("ab", &[Edit::insert("x", 3)]).is_err());
        assert!(apply_edits("é", &[Edit::insert("x", 1)]).is_err());
    }

    #[test]
    fn test_commit_writes_all() {
        let temp_dir = TempDir::new().unwrap();
        let document = temp_dir.path().join("a.lua");
        let module = temp_dir.path().join("nested").join("hashes.lua");
        fs::write(&document, "old").unwrap();

        commit(&[
            PendingWrite {
                path: module.clone(),
                contents: "module".to_string(),
                previous: None,
            },
            PendingWrite {
                path: document.clone(),
                contents: "new".to_string(),
                previous: Some("old".to_string()),
            },
        ])
        .unwrap();

        assert_eq!(fs::read_to_string(&module).unwrap(), "module");
        assert_eq!(fs::read_to_string(&document).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_rolls_back_created_file() {
        let temp_dir = TempDir::new().unwrap();
        let module = temp_dir.path().join("hashes.lua");
        // A regular file where a directory is expected makes the second write fail
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = commit(&[
            PendingWrite {
                path: module.clone(),
                contents: "module".to_string(),
                previous: None,
            },
            PendingWrite {
                path: blocker.join("a.lua"),
                contents: "new".to_string(),
                previous: Some("old".to_string()),
            },
        ]);

        assert!(result.is_err());
        assert!(!module.exists());
    }
}
