use crate::apply::{PendingWrite, apply_edits, commit};
use crate::config::ServiceConfig;
use crate::errors::ServiceError;
use crate::refactoring::{RefactorEdits, RefactorOptions, refactor_hashes};
use crate::selection::{SelectionRange, capture_selections};
use crate::settings::{self, OptionOverrides};
use crate::text::{OffsetEncoding, encode_edits};
use crate::tool_router::ToolRouter;
use crate::tools::ToolService;
use crate::types::*;
use crate::workspace::{
    FileSnapshot, canonical_document_path, ensure_within_roots, owning_root, read_document,
    read_module, resolve_module_path,
};

use rmcp::{
    ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorData, Implementation, InitializeResult,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities,
    },
    service::{RequestContext, RoleServer},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Clone)]
pub struct HashRefactorService {
    config: ServiceConfig,
    /// Held from snapshot to write so applies never interleave
    apply_lock: Arc<Mutex<()>>,
}

impl Default for HashRefactorService {
    fn default() -> Self {
        Self::new()
    }
}

/// Options in effect for one document, and where they came from.
struct ResolvedOptions {
    options: RefactorOptions,
    settings_file: Option<PathBuf>,
}

impl HashRefactorService {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            config,
            apply_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Server defaults, then the nearest settings file, then call overrides.
    fn resolve_options(
        &self,
        document: &Path,
        overrides: Option<&OptionOverrides>,
    ) -> Result<ResolvedOptions, ServiceError> {
        let mut options = self.config.default_options.clone();
        let mut settings_file = None;

        if let Some(dir) = document.parent() {
            let root = owning_root(document, &self.config.root_directories).ok();
            if let Some((path, file_overrides)) =
                settings::discover(dir, &self.config.settings_file_name, root.as_deref())?
            {
                options = file_overrides.apply_to(&options);
                settings_file = Some(path);
            }
        }

        if let Some(overrides) = overrides {
            options = overrides.apply_to(&options);
        }

        Ok(ResolvedOptions {
            options,
            settings_file,
        })
    }

    fn reference_for(request_name: &str, options: &RefactorOptions) -> String {
        if options.is_module_mode() {
            format!("{}.{request_name}", options.require_binding())
        } else {
            request_name.to_string()
        }
    }

    fn summarize(
        edits: &RefactorEdits,
        options: &RefactorOptions,
    ) -> (Vec<DeclarationSummary>, usize) {
        let declarations = edits
            .requests
            .iter()
            .map(|request| {
                let reference = Self::reference_for(&request.name, options);
                DeclarationSummary::from_request(request, reference, &edits.document_edits)
            })
            .collect();
        let total_replacements = edits
            .document_edits
            .iter()
            .filter(|edit| !edit.is_insert())
            .count();
        (declarations, total_replacements)
    }

    fn collect_selections(
        text: &str,
        literals: &[String],
        ranges: &[SelectionRange],
        encoding: OffsetEncoding,
    ) -> Vec<String> {
        let mut selections = literals.to_vec();
        selections.extend(capture_selections(text, ranges, encoding));
        selections
    }

    /// Refactor literals in a script on disk, optionally writing the result.
    #[tracing::instrument(skip(self, param), fields(file_path = %param.file_path, dry_run = param.dry_run))]
    pub async fn refactor_hash(
        &self,
        param: RefactorHashParam,
    ) -> Result<RefactorHashResult, ServiceError> {
        let document_path = canonical_document_path(Path::new(&param.file_path))?;
        if !param.dry_run {
            ensure_within_roots(&document_path, &self.config.root_directories)?;
        }

        let resolved = self.resolve_options(&document_path, param.options.as_ref())?;
        let options = resolved.options;

        // Snapshot and write under one lock so offsets stay valid
        let _guard = if param.dry_run {
            None
        } else {
            Some(self.apply_lock.lock().await)
        };

        let document = read_document(&document_path, self.config.max_file_size)?;
        let document_hash = document.hash();
        if let Some(expected) = &param.expected_document_hash {
            if expected != &document_hash {
                return Err(ServiceError::StaleSnapshot {
                    expected: expected.clone(),
                    actual: document_hash,
                });
            }
        }

        let module = if options.is_module_mode() {
            let module_path = resolve_module_path(
                &document_path,
                &options.module_path,
                &self.config.root_directories,
            )?;
            Some(read_module(&module_path)?)
        } else {
            None
        };
        let module_text = module.as_ref().map_or("", |snapshot| snapshot.text.as_str());

        let selections = Self::collect_selections(
            &document.text,
            &param.literals,
            &param.selections,
            param.offset_encoding,
        );
        let edits = refactor_hashes(&selections, &document.text, module_text, &options);
        debug!(
            selections = selections.len(),
            document_edits = edits.document_edits.len(),
            module_edits = edits.module_edits.len(),
            "computed edits"
        );

        let new_document = apply_edits(&document.text, &edits.document_edits)?;
        let new_module = match &module {
            Some(snapshot) => Some(apply_edits(&snapshot.text, &edits.module_edits)?),
            None => None,
        };

        let module_created = module
            .as_ref()
            .is_some_and(|snapshot| !snapshot.exists && !edits.module_edits.is_empty());

        let applied = if param.dry_run || edits.is_empty() {
            false
        } else {
            let writes = Self::pending_writes(
                &document,
                &edits,
                module.as_ref(),
                new_module.as_deref(),
                &new_document,
            );
            commit(&writes)?;
            info!(
                file = %document.path.display(),
                files_written = writes.len(),
                "applied hash refactoring"
            );
            true
        };

        let (declarations, total_replacements) = Self::summarize(&edits, &options);
        let (new_document, new_module) = if param.include_preview {
            (Some(new_document), new_module)
        } else {
            (None, None)
        };

        Ok(RefactorHashResult {
            file_path: document.path.to_string_lossy().to_string(),
            module_file: module
                .as_ref()
                .map(|snapshot| snapshot.path.to_string_lossy().to_string()),
            module_created,
            declarations,
            document_edits: encode_edits(&document.text, &edits.document_edits, param.offset_encoding),
            module_edits: encode_edits(module_text, &edits.module_edits, param.offset_encoding),
            total_replacements,
            offset_encoding: param.offset_encoding,
            document_hash,
            applied,
            new_document,
            new_module,
            options,
        })
    }

    /// Module first, so a freshly created module exists before the script requires it.
    fn pending_writes(
        document: &FileSnapshot,
        edits: &RefactorEdits,
        module: Option<&FileSnapshot>,
        new_module: Option<&str>,
        new_document: &str,
    ) -> Vec<PendingWrite> {
        let mut writes = Vec::new();
        if let (Some(snapshot), Some(contents)) = (module, new_module) {
            if !edits.module_edits.is_empty() {
                writes.push(PendingWrite {
                    path: snapshot.path.clone(),
                    contents: contents.to_string(),
                    previous: snapshot.exists.then(|| snapshot.text.clone()),
                });
            }
        }
        if !edits.document_edits.is_empty() {
            writes.push(PendingWrite {
                path: document.path.clone(),
                contents: new_document.to_string(),
                previous: Some(document.text.clone()),
            });
        }
        writes
    }

    /// Refactor literals in a code snippet. Nothing is read from or written to disk.
    #[tracing::instrument(skip(self, param), fields(code_length = param.code.len()))]
    pub async fn refactor_hash_text(
        &self,
        param: RefactorHashTextParam,
    ) -> Result<RefactorHashTextResult, ServiceError> {
        let options = match &param.options {
            Some(overrides) => overrides.apply_to(&self.config.default_options),
            None => self.config.default_options.clone(),
        };

        let selections = Self::collect_selections(
            &param.code,
            &param.literals,
            &param.selections,
            param.offset_encoding,
        );
        let edits = refactor_hashes(&selections, &param.code, &param.module_code, &options);

        let new_code = apply_edits(&param.code, &edits.document_edits)?;
        let new_module_code = if options.is_module_mode() {
            Some(apply_edits(&param.module_code, &edits.module_edits)?)
        } else {
            None
        };

        let (declarations, total_replacements) = Self::summarize(&edits, &options);

        Ok(RefactorHashTextResult {
            declarations,
            document_edits: encode_edits(&param.code, &edits.document_edits, param.offset_encoding),
            module_edits: encode_edits(&param.module_code, &edits.module_edits, param.offset_encoding),
            total_replacements,
            offset_encoding: param.offset_encoding,
            new_code,
            new_module_code,
            options,
        })
    }

    /// Effective options for a script and the module file they point at.
    #[tracing::instrument(skip(self, param), fields(file_path = %param.file_path))]
    pub async fn resolve_settings(
        &self,
        param: ResolveSettingsParam,
    ) -> Result<ResolveSettingsResult, ServiceError> {
        let document_path = canonical_document_path(Path::new(&param.file_path))?;
        let resolved = self.resolve_options(&document_path, None)?;

        let (module_file, module_exists) = if resolved.options.is_module_mode() {
            let module_path = resolve_module_path(
                &document_path,
                &resolved.options.module_path,
                &self.config.root_directories,
            )?;
            let exists = read_module(&module_path)?.exists;
            (Some(module_path.to_string_lossy().to_string()), exists)
        } else {
            (None, false)
        };

        Ok(ResolveSettingsResult {
            options: resolved.options,
            settings_file: resolved
                .settings_file
                .map(|path| path.to_string_lossy().to_string()),
            module_file,
            module_exists,
        })
    }
}

impl ServerHandler for HashRefactorService {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            capabilities: ServerCapabilities {
                tools: Some(rmcp::model::ToolsCapability { list_changed: Some(true) }),
                ..Default::default()
            },
            instructions: Some("This MCP server turns Lua string literals into named hash constants (`local h_player = hash(\"player\")`) and rewrites every occurrence to the constant. Use `refactor_hash` on a script file (dry_run defaults to true), `refactor_hash_text` for snippets, and `resolve_settings` to see which prefix/module options apply to a file.".into()),
        }
    }

    #[tracing::instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ToolService::list_tools())
    }

    #[tracing::instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        ToolRouter::route_tool_call(self, request).await
    }
}
