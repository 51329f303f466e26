use crate::refactoring::{Edit, HashRequest, RefactorOptions};
use crate::selection::SelectionRange;
use crate::settings::OptionOverrides;
use crate::text::OffsetEncoding;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// File-based refactoring types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorHashParam {
    /// Script to refactor
    pub file_path: String,
    /// Literal texts, with or without quotes
    #[serde(default)]
    pub literals: Vec<String>,
    /// Editor selections; a bare cursor selects the word under it
    #[serde(default)]
    pub selections: Vec<SelectionRange>,
    /// Overrides on top of the server defaults and the project settings file
    #[serde(default)]
    pub options: Option<OptionOverrides>,
    #[serde(default = "default_true")]
    pub dry_run: bool,
    /// Unit for selection characters and returned offsets
    #[serde(default)]
    pub offset_encoding: OffsetEncoding,
    /// Refuse to apply if the document no longer has this hash
    #[serde(default)]
    pub expected_document_hash: Option<String>,
    /// Include the resulting texts in the response
    #[serde(default)]
    pub include_preview: bool,
}

impl RefactorHashParam {
    pub fn new(file_path: impl Into<String>, literals: &[&str]) -> Self {
        Self {
            file_path: file_path.into(),
            literals: literals.iter().map(|literal| literal.to_string()).collect(),
            ..Default::default()
        }
    }
}

impl Default for RefactorHashParam {
    fn default() -> Self {
        Self {
            file_path: String::new(),
            literals: Vec::new(),
            selections: Vec::new(),
            options: None,
            dry_run: true,
            offset_encoding: OffsetEncoding::default(),
            expected_document_hash: None,
            include_preview: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorHashResult {
    pub file_path: String,
    /// Absolute module path in module mode
    pub module_file: Option<String>,
    /// Module file did not exist and is (or would be) created
    pub module_created: bool,
    pub options: RefactorOptions,
    pub declarations: Vec<DeclarationSummary>,
    pub document_edits: Vec<Edit>,
    pub module_edits: Vec<Edit>,
    pub total_replacements: usize,
    pub offset_encoding: OffsetEncoding,
    /// Hash of the document text the edits were computed against
    pub document_hash: String,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_module: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSummary {
    /// Literal value with quotes and prefix stripped
    pub literal: String,
    pub name: String,
    /// What occurrences are rewritten to (`name`, or `binding.name` in module mode)
    pub reference: String,
    /// A declaration for `name` was already present
    pub already_declared: bool,
    pub replacements: usize,
}

impl DeclarationSummary {
    pub fn from_request(request: &HashRequest, reference: String, document_edits: &[Edit]) -> Self {
        let replacements = document_edits
            .iter()
            .filter(|edit| !edit.is_insert() && edit.text() == reference)
            .count();
        Self {
            literal: request.value.clone(),
            name: request.name.clone(),
            reference,
            already_declared: !request.should_declare,
            replacements,
        }
    }
}

// Snippet refactoring types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefactorHashTextParam {
    pub code: String,
    /// Current module text; empty when the module does not exist
    #[serde(default)]
    pub module_code: String,
    #[serde(default)]
    pub literals: Vec<String>,
    #[serde(default)]
    pub selections: Vec<SelectionRange>,
    #[serde(default)]
    pub options: Option<OptionOverrides>,
    #[serde(default)]
    pub offset_encoding: OffsetEncoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorHashTextResult {
    pub options: RefactorOptions,
    pub declarations: Vec<DeclarationSummary>,
    pub document_edits: Vec<Edit>,
    pub module_edits: Vec<Edit>,
    pub total_replacements: usize,
    pub offset_encoding: OffsetEncoding,
    pub new_code: String,
    /// Resulting module text in module mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_module_code: Option<String>,
}

// Settings types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveSettingsParam {
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveSettingsResult {
    pub options: RefactorOptions,
    /// Settings file the options were read from, if any
    pub settings_file: Option<String>,
    pub module_file: Option<String>,
    pub module_exists: bool,
}
