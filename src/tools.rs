use rmcp::model::{ListToolsResult, Tool};
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub struct ToolService;

fn schema(value: Value) -> Arc<Map<String, Value>> {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(Map::new()),
    }
}

fn options_schema() -> Value {
    json!({
        "type": "object",
        "description": "Overrides for the project settings (.hash-refactor.yml)",
        "properties": {
            "prefix": { "type": "string", "description": "Prepended to every constant name and stripped from selections" },
            "capitalise": { "type": "boolean", "description": "Upper-case the part of the name derived from the literal" },
            "modulePath": { "type": "string", "description": "Workspace-relative Lua module to collect declarations in; empty declares locals in the script" },
            "moduleRequireBinding": { "type": "string", "description": "Local name the module is required as (default: h)" }
        }
    })
}

fn selections_schema() -> Value {
    let position = json!({
        "type": "object",
        "properties": {
            "line": { "type": "integer", "minimum": 0 },
            "character": { "type": "integer", "minimum": 0 }
        },
        "required": ["line", "character"]
    });
    json!({
        "type": "array",
        "description": "Editor selections (zero-based). An empty selection selects the word under the cursor; multi-line selections are ignored.",
        "items": {
            "type": "object",
            "properties": { "start": position, "end": position },
            "required": ["start", "end"]
        }
    })
}

fn offset_encoding_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["utf8", "utf16", "chars"],
        "default": "utf8",
        "description": "Unit for selection characters and returned edit offsets"
    })
}

impl ToolService {
    pub fn list_tools() -> ListToolsResult {
        ListToolsResult {
            tools: vec![
                Tool::new(
                    "refactor_hash",
                    "Turn string literals in a Lua script into hash constants: declares `local name = hash(\"literal\")` (or a member of a hash module) once and rewrites every single- or double-quoted occurrence. Preview by default; set dry_run=false to write the files.",
                    schema(json!({
                        "type": "object",
                        "properties": {
                            "file_path": { "type": "string", "description": "Script to refactor" },
                            "literals": { "type": "array", "items": { "type": "string" }, "description": "Literal texts, quoted or bare" },
                            "selections": selections_schema(),
                            "options": options_schema(),
                            "dry_run": { "type": "boolean", "default": true, "description": "If true (default), only return the edits. If false, write the script and module." },
                            "offset_encoding": offset_encoding_schema(),
                            "expected_document_hash": { "type": "string", "description": "document_hash from an earlier call; the call fails if the script changed since" },
                            "include_preview": { "type": "boolean", "default": false, "description": "Include the resulting file contents" }
                        },
                        "required": ["file_path"]
                    })),
                ),
                Tool::new(
                    "refactor_hash_text",
                    "Same as refactor_hash, on a code snippet instead of a file. Returns the edits and the resulting code.",
                    schema(json!({
                        "type": "object",
                        "properties": {
                            "code": { "type": "string" },
                            "module_code": { "type": "string", "description": "Current hash module text; empty when it does not exist yet" },
                            "literals": { "type": "array", "items": { "type": "string" } },
                            "selections": selections_schema(),
                            "options": options_schema(),
                            "offset_encoding": offset_encoding_schema()
                        },
                        "required": ["code"]
                    })),
                ),
                Tool::new(
                    "resolve_settings",
                    "Show the hash refactoring options that apply to a file and the settings file they come from.",
                    schema(json!({
                        "type": "object",
                        "properties": {
                            "file_path": { "type": "string" }
                        },
                        "required": ["file_path"]
                    })),
                ),
            ],
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tools() {
        let tools = ToolService::list_tools().tools;
        let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_ref()).collect();
        assert_eq!(names, vec!["refactor_hash", "refactor_hash_text", "resolve_settings"]);
        for tool in &tools {
            assert_eq!(tool.input_schema.get("type"), Some(&json!("object")));
        }
    }
}
