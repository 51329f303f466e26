//! # Hash Refactoring Types
//!
//! Data types shared by the hash refactoring engine: the options that shape
//! generated names, the per-literal requests, and the edits the engine emits.

use serde::{Deserialize, Serialize};

/// Binding used for the module import when none is configured.
pub const DEFAULT_MODULE_REQUIRE_BINDING: &str = "h";

/// Table name used inside a generated hash module.
pub const MODULE_TABLE: &str = "M";

/// Options controlling how declarations are named and where they are placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefactorOptions {
    /// Prepended to every identifier, and stripped from selections before processing
    pub prefix: String,
    /// Upper-case the identifier derived from the literal (the prefix is left alone)
    pub capitalise: bool,
    /// Path of a separate hash module, relative to the workspace root. Empty disables module mode.
    pub module_path: String,
    /// Name of the local that imports the hash module
    pub module_require_binding: String,
}

impl Default for RefactorOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            capitalise: false,
            module_path: String::new(),
            module_require_binding: DEFAULT_MODULE_REQUIRE_BINDING.to_string(),
        }
    }
}

impl RefactorOptions {
    pub fn is_module_mode(&self) -> bool {
        !self.module_path.is_empty()
    }

    /// The import binding, falling back to the default when left blank.
    pub fn require_binding(&self) -> &str {
        if self.module_require_binding.is_empty() {
            DEFAULT_MODULE_REQUIRE_BINDING
        } else {
            &self.module_require_binding
        }
    }
}

/// One literal the caller wants turned into a hash constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRequest {
    /// Literal text with quotes and prefix stripped
    pub value: String,
    /// Name of the declaration (prefix + identifier)
    pub name: String,
    /// `"value"` with the payload escaped
    pub double_quoted: String,
    /// `'value'` with the payload escaped
    pub single_quoted: String,
    /// False when the target already binds `name` to a hash call
    pub should_declare: bool,
}

/// A single text edit against a frozen snapshot.
///
/// Offsets are byte offsets into the original text of the edit's target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Edit {
    #[serde(rename_all = "camelCase")]
    Insert { text: String, offset: usize },
    #[serde(rename_all = "camelCase")]
    Replace {
        text: String,
        start_offset: usize,
        end_offset: usize,
    },
}

impl Edit {
    pub fn insert(text: impl Into<String>, offset: usize) -> Self {
        Edit::Insert {
            text: text.into(),
            offset,
        }
    }

    pub fn replace(text: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Edit::Replace {
            text: text.into(),
            start_offset,
            end_offset,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Edit::Insert { text, .. } | Edit::Replace { text, .. } => text,
        }
    }

    /// Start of the affected span in the original text.
    pub fn start(&self) -> usize {
        match self {
            Edit::Insert { offset, .. } => *offset,
            Edit::Replace { start_offset, .. } => *start_offset,
        }
    }

    /// End (exclusive) of the affected span in the original text.
    pub fn end(&self) -> usize {
        match self {
            Edit::Insert { offset, .. } => *offset,
            Edit::Replace { end_offset, .. } => *end_offset,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Edit::Insert { .. })
    }
}

/// Edits produced by one engine run, split by target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactorEdits {
    pub document_edits: Vec<Edit>,
    pub module_edits: Vec<Edit>,
    /// Requests processed in selection order, after deduplication
    #[serde(skip)]
    pub requests: Vec<HashRequest>,
}

impl RefactorEdits {
    pub fn is_empty(&self) -> bool {
        self.document_edits.is_empty() && self.module_edits.is_empty()
    }
}
