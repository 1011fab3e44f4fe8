//! Wire types for the MCP endpoint.
//!
//! The surface is deliberately small: a request is `{method, params}`,
//! `tools/list` answers with tool definitions, and `tools/call` answers
//! with text content blocks.

use serde::{Deserialize, Serialize};

/// An incoming MCP request.
#[derive(Debug, Clone, Deserialize)]
pub struct McpRequest {
    /// Requested method, e.g. `tools/list` or `tools/call`.
    pub method: Option<String>,
    /// Method parameters; shape depends on the method.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// One content block of a `tools/call` response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }
}

/// Result of a successful `tools/call`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<Content>,
}
