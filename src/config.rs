use crate::refactoring::RefactorOptions;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum file size to process (in bytes)
    pub max_file_size: u64,
    /// Workspace roots; documents and module files must live under one of them
    pub root_directories: Vec<PathBuf>,
    /// Options used when neither a settings file nor the tool call sets them
    pub default_options: RefactorOptions,
    /// File name looked up from the document's directory towards the root
    pub settings_file_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10MB
            root_directories: vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))],
            default_options: RefactorOptions::default(),
            settings_file_name: crate::settings::SETTINGS_FILE_NAME.to_string(),
        }
    }
}
