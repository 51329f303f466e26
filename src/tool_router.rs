//! # Tool Router Module
//!
//! Handles routing of MCP tool calls to the hash refactoring service.

use crate::hash_refactor_service::HashRefactorService;
use crate::response_formatter::ResponseFormatter;
use crate::types::*;

use rmcp::model::{CallToolRequestParam, CallToolResult, ErrorData};
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Routes tool calls to appropriate service methods
pub struct ToolRouter;

impl ToolRouter {
    /// Helper function to parse request parameters
    fn parse_params<T: DeserializeOwned>(request: &CallToolRequestParam) -> Result<T, ErrorData> {
        serde_json::from_value(serde_json::Value::Object(
            request.arguments.clone().unwrap_or_default(),
        ))
        .map_err(|e| ErrorData::invalid_params(Cow::Owned(e.to_string()), None))
    }

    /// Helper function to create formatted response
    fn create_formatted_response<T: serde::Serialize>(
        result: &T,
        summary: String,
    ) -> Result<CallToolResult, ErrorData> {
        ResponseFormatter::create_formatted_response(result, summary)
            .map_err(|e| ErrorData::internal_error(Cow::Owned(e.to_string()), None))
    }

    fn has_argument(request: &CallToolRequestParam, name: &str) -> bool {
        request
            .arguments
            .as_ref()
            .is_some_and(|args| args.contains_key(name))
    }

    /// Route a tool call to the appropriate service method
    pub async fn route_tool_call(
        service: &HashRefactorService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        match request.name.as_ref() {
            "refactor_hash" => Self::handle_refactor_hash(service, request).await,
            "refactor_hash_text" => Self::handle_refactor_hash_text(service, request).await,
            "resolve_settings" => Self::handle_resolve_settings(service, request).await,
            _ => Err(ErrorData::method_not_found::<
                rmcp::model::CallToolRequestMethod,
            >()),
        }
    }

    async fn handle_refactor_hash(
        service: &HashRefactorService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        // Error handling for common LLM misuse patterns
        if Self::has_argument(&request, "code") {
            return Err(ErrorData::invalid_params(
                Cow::Borrowed(
                    "The 'refactor_hash' tool works on files and does not accept 'code'. To refactor a snippet, use the 'refactor_hash_text' tool.",
                ),
                None,
            ));
        }

        let param: RefactorHashParam = Self::parse_params(&request)?;

        if param.file_path.is_empty() {
            return Err(ErrorData::invalid_params(
                Cow::Borrowed("The 'refactor_hash' tool requires the 'file_path' parameter."),
                None,
            ));
        }
        if param.literals.is_empty() && param.selections.is_empty() {
            return Err(ErrorData::invalid_params(
                Cow::Borrowed(
                    "Provide the literals to refactor in 'literals', or editor ranges in 'selections'.",
                ),
                None,
            ));
        }

        let result = service.refactor_hash(param).await.map_err(ErrorData::from)?;
        let summary = ResponseFormatter::format_refactor_hash_result(&result);
        Self::create_formatted_response(&result, summary)
    }

    async fn handle_refactor_hash_text(
        service: &HashRefactorService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        if Self::has_argument(&request, "file_path") {
            return Err(ErrorData::invalid_params(
                Cow::Borrowed(
                    "The 'refactor_hash_text' tool works on the 'code' parameter and does not accept 'file_path'. To refactor a file, use the 'refactor_hash' tool.",
                ),
                None,
            ));
        }

        let param: RefactorHashTextParam = Self::parse_params(&request)?;

        if param.literals.is_empty() && param.selections.is_empty() {
            return Err(ErrorData::invalid_params(
                Cow::Borrowed(
                    "Provide the literals to refactor in 'literals', or editor ranges in 'selections'.",
                ),
                None,
            ));
        }

        let result = service
            .refactor_hash_text(param)
            .await
            .map_err(ErrorData::from)?;
        let summary = ResponseFormatter::format_refactor_hash_text_result(&result);
        Self::create_formatted_response(&result, summary)
    }

    async fn handle_resolve_settings(
        service: &HashRefactorService,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        let param: ResolveSettingsParam = Self::parse_params(&request)?;

        if param.file_path.is_empty() {
            return Err(ErrorData::invalid_params(
                Cow::Borrowed("The 'resolve_settings' tool requires the 'file_path' parameter."),
                None,
            ));
        }

        let result = service
            .resolve_settings(param)
            .await
            .map_err(ErrorData::from)?;
        let summary = ResponseFormatter::format_settings_result(&result);
        Self::create_formatted_response(&result, summary)
    }
}
