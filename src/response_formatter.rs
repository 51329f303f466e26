use crate::types::*;
use rmcp::model::{CallToolResult, Content};

pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Create a formatted response with both JSON data and human-readable text
    pub fn create_formatted_response<T>(
        result: &T,
        summary: String,
    ) -> Result<CallToolResult, Box<dyn std::error::Error + Send + Sync>>
    where
        T: serde::Serialize,
    {
        let json_value = serde_json::to_value(result)?;

        let contents = vec![Content::text(summary), Content::json(json_value)?];

        Ok(CallToolResult::success(contents))
    }

    fn push_declarations(summary: &mut String, declarations: &[DeclarationSummary]) {
        for (i, declaration) in declarations.iter().take(10).enumerate() {
            let status = if declaration.already_declared {
                "already declared"
            } else {
                "declared"
            };
            summary.push_str(&format!(
                "\n{}. `\"{}\"` → `{}` ({status}, {} replacements)",
                i + 1,
                declaration.literal,
                declaration.reference,
                declaration.replacements
            ));
        }

        if declarations.len() > 10 {
            summary.push_str(&format!(
                "\n... and {} more literals",
                declarations.len() - 10
            ));
        }
    }

    /// Format a file refactoring result with a readable summary
    pub fn format_refactor_hash_result(result: &RefactorHashResult) -> String {
        if result.declarations.is_empty() {
            return "#️⃣ **No literals to refactor**\n\nNo selection resolved to a string literal.".to_string();
        }

        let mode = if result.applied {
            "✅ **Applied**"
        } else {
            "👀 **Preview** (dry run, nothing written)"
        };

        let mut summary = format!(
            "#️⃣ **Hash Refactoring**\n\n📄 **File**: `{}`\n{mode}\n🔁 **Replacements**: {}\n",
            result.file_path, result.total_replacements
        );

        if let Some(module_file) = &result.module_file {
            let created = if result.module_created {
                " (new file)"
            } else {
                ""
            };
            summary.push_str(&format!("📦 **Module**: `{module_file}`{created}\n"));
        }

        Self::push_declarations(&mut summary, &result.declarations);

        if result.document_edits.is_empty() && result.module_edits.is_empty() {
            summary.push_str("\n\nNothing to change; the file is already refactored.");
        }

        summary
    }

    /// Format a snippet refactoring result with a readable summary
    pub fn format_refactor_hash_text_result(result: &RefactorHashTextResult) -> String {
        if result.declarations.is_empty() {
            return "#️⃣ **No literals to refactor**\n\nNo selection resolved to a string literal.".to_string();
        }

        let mut summary = format!(
            "#️⃣ **Hash Refactoring**\n\n🔁 **Replacements**: {}\n",
            result.total_replacements
        );
        Self::push_declarations(&mut summary, &result.declarations);
        summary.push_str(&format!("\n\n**Result**:\n```lua\n{}\n```", result.new_code));

        if let Some(module_code) = &result.new_module_code {
            summary.push_str(&format!("\n\n**Module**:\n```lua\n{module_code}\n```"));
        }

        summary
    }

    /// Format resolved settings with a readable summary
    pub fn format_settings_result(result: &ResolveSettingsResult) -> String {
        let options = &result.options;
        let mut summary = format!(
            "⚙️ **Hash Refactoring Settings**\n\n🏷️ **Prefix**: `{}`\n🔠 **Capitalise**: {}\n",
            options.prefix, options.capitalise
        );

        match &result.module_file {
            Some(module_file) => {
                let state = if result.module_exists {
                    "exists"
                } else {
                    "will be created"
                };
                summary.push_str(&format!(
                    "📦 **Module**: `{module_file}` ({state}), required as `{}`\n",
                    options.require_binding()
                ));
            }
            None => summary.push_str("📦 **Module**: none, constants are declared as locals\n"),
        }

        match &result.settings_file {
            Some(path) => summary.push_str(&format!("📝 **Settings file**: `{path}`")),
            None => summary.push_str("📝 **Settings file**: none found, using server defaults"),
        }

        summary
    }
}
