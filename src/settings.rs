//! # Project Settings (.hash-refactor.yml)
//!
//! Per-project refactoring options, discovered by walking up from the edited
//! file. Every key is optional; unset keys fall through to the server
//! defaults, and tool-call overrides win over both.
//!
//! ```yaml
//! prefix: h_
//! capitalise: false
//! modulePath: main/hashes.lua
//! moduleRequireBinding: h
//! ```

use crate::errors::ServiceError;
use crate::refactoring::RefactorOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SETTINGS_FILE_NAME: &str = ".hash-refactor.yml";

/// Partial options as written in a settings file or passed with a tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capitalise: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_require_binding: Option<String>,
}

impl OptionOverrides {
    /// Layer these overrides on top of `base`.
    pub fn apply_to(&self, base: &RefactorOptions) -> RefactorOptions {
        RefactorOptions {
            prefix: self.prefix.clone().unwrap_or_else(|| base.prefix.clone()),
            capitalise: self.capitalise.unwrap_or(base.capitalise),
            module_path: self
                .module_path
                .clone()
                .unwrap_or_else(|| base.module_path.clone()),
            module_require_binding: self
                .module_require_binding
                .clone()
                .filter(|binding| !binding.is_empty())
                .unwrap_or_else(|| base.module_require_binding.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Load overrides from a settings file
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse overrides from YAML. An empty document means no overrides.
    pub fn from_yaml(yaml: &str) -> Result<Self, ServiceError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(ServiceError::from)
    }
}

/// Find the nearest settings file, walking up from `start_dir` but never
/// above `stop_at` when given.
pub fn discover(
    start_dir: &Path,
    file_name: &str,
    stop_at: Option<&Path>,
) -> Result<Option<(PathBuf, OptionOverrides)>, ServiceError> {
    let mut current = Some(start_dir);

    while let Some(dir) = current {
        let candidate = dir.join(file_name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "found settings file");
            let overrides = OptionOverrides::from_file(&candidate)?;
            return Ok(Some((candidate, overrides)));
        }
        if stop_at.is_some_and(|root| dir == root) {
            break;
        }
        current = dir.parent();
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_camel_case_keys() {
        let overrides = OptionOverrides::from_yaml(
            "prefix: h_\ncapitalise: true\nmodulePath: main/hashes.lua\nmoduleRequireBinding: hashes\n",
        )
        .unwrap();
        assert_eq!(overrides.prefix.as_deref(), Some("h_"));
        assert_eq!(overrides.capitalise, Some(true));
        assert_eq!(overrides.module_path.as_deref(), Some("main/hashes.lua"));
        assert_eq!(overrides.module_require_binding.as_deref(), Some("hashes"));
    }

    #[test]
    fn test_empty_yaml_is_no_overrides() {
        assert!(OptionOverrides::from_yaml("").unwrap().is_empty());
        assert!(OptionOverrides::from_yaml("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_yaml_errors() {
        assert!(OptionOverrides::from_yaml("capitalise: [nope").is_err());
    }

    #[test]
    fn test_apply_to_layers_over_base() {
        let base = RefactorOptions {
            prefix: "h_".to_string(),
            ..Default::default()
        };
        let overrides = OptionOverrides {
            capitalise: Some(true),
            module_require_binding: Some(String::new()),
            ..Default::default()
        };
        let options = overrides.apply_to(&base);
        assert_eq!(options.prefix, "h_");
        assert!(options.capitalise);
        assert_eq!(options.module_require_binding, "h");
    }

    #[test]
    fn test_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("main").join("scripts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), "prefix: h_\n").unwrap();

        let (path, overrides) = discover(&nested, SETTINGS_FILE_NAME, Some(temp_dir.path()))
            .unwrap()
            .unwrap();
        assert_eq!(path, temp_dir.path().join(SETTINGS_FILE_NAME));
        assert_eq!(overrides.prefix.as_deref(), Some("h_"));
    }

    #[test]
    fn test_discover_stops_at_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir_all(&root).unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILE_NAME), "prefix: h_\n").unwrap();

        assert!(discover(&root, SETTINGS_FILE_NAME, Some(&root)).unwrap().is_none());
    }
}
