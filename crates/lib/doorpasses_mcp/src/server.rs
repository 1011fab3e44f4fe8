//! MCP request dispatch.
//!
//! A small protocol router over the tool registry: `tools/list` and
//! `tools/call`. Handler output is rendered into text content blocks;
//! handler failures are normalized into `Tool execution failed: ...`
//! messages so the wire never carries raw internal errors.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::debug;

use crate::auth::McpContext;
use crate::registry::{McpError, ToolRegistry};
use crate::types::{Content, McpRequest, ToolCallResult};

/// Look up and run a tool, rendering its output as text content.
///
/// String results pass through verbatim; anything else is pretty-printed
/// JSON.
pub async fn execute_tool(
    registry: &ToolRegistry,
    name: &str,
    arguments: Value,
    context: &McpContext,
) -> Result<ToolCallResult, McpError> {
    let tool = registry
        .get(name)
        .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

    let value = tool
        .handler
        .call(context, arguments)
        .await
        .map_err(|e| McpError::ToolExecutionFailed(e.to_string()))?;

    let text = match value {
        Value::String(s) => s,
        other => serde_json::to_string_pretty(&other)
            .map_err(|e| McpError::ToolExecutionFailed(e.to_string()))?,
    };

    Ok(ToolCallResult {
        content: vec![Content::text(text)],
    })
}

/// Route one MCP request.
pub async fn handle_request(
    registry: &ToolRegistry,
    context: &McpContext,
    request: McpRequest,
) -> Result<Value, McpError> {
    let method = request
        .method
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or(McpError::MissingMethod)?;

    match method {
        "tools/list" => Ok(json!({"tools": registry.definitions()})),
        "tools/call" => {
            let name = request
                .params
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or(McpError::MissingToolName)?;
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or(Value::Null);

            let result = execute_tool(registry, name, arguments, context).await?;
            serde_json::to_value(&result)
                .map_err(|e| McpError::ToolExecutionFailed(e.to_string()))
        }
        other => Err(McpError::UnknownMethod(other.to_string())),
    }
}

/// Axum handler for `POST /mcp`.
///
/// The auth middleware has already attached an [`McpContext`]. Dispatch
/// errors map to 400 except handler failures, which map to 500.
pub async fn handle_mcp(
    State(registry): State<Arc<ToolRegistry>>,
    Extension(context): Extension<McpContext>,
    Json(request): Json<McpRequest>,
) -> Response {
    match handle_request(&registry, &context, request).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            debug!(user_id = %context.user_id, error = %e, "MCP request failed");
            let status = match &e {
                McpError::ToolExecutionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            };
            (status, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}
