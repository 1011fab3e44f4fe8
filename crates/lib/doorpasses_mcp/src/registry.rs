//! Tool registry.
//!
//! An explicit registry object, populated once at startup and then shared
//! read-only behind an `Arc`. Registering a duplicate name is a hard
//! error so configuration mistakes surface at boot instead of silently
//! shadowing an existing tool.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::McpContext;
use crate::types::ToolDefinition;

/// Errors surfaced by the MCP dispatch layer.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Tool already registered: {0}")]
    ToolAlreadyRegistered(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Normalized handler failure; the original error is in the message.
    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Missing method in request")]
    MissingMethod,

    #[error("Missing tool name in params")]
    MissingToolName,

    #[error("Unknown method: {0}")]
    UnknownMethod(String),
}

/// Error produced by a tool handler. The dispatcher wraps it into
/// `McpError::ToolExecutionFailed` before it reaches the wire.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ToolError(pub String);

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        ToolError(message.into())
    }
}

impl From<sqlx::Error> for ToolError {
    fn from(e: sqlx::Error) -> Self {
        ToolError(e.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError(e.to_string())
    }
}

impl From<doorpasses_core::oauth::OAuthError> for ToolError {
    fn from(e: doorpasses_core::oauth::OAuthError) -> Self {
        ToolError(e.to_string())
    }
}

/// An executable tool.
///
/// Handlers receive the authenticated context plus the caller-supplied
/// arguments, and return a JSON value that the dispatcher renders into
/// text content.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(
        &self,
        context: &McpContext,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError>;
}

/// A tool definition paired with its handler.
#[derive(Clone)]
pub struct RegisteredTool {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

/// Insertion-ordered collection of registered tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool. Fails if the name is already taken.
    pub fn register(
        &mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), McpError> {
        if self.tools.iter().any(|t| t.definition.name == definition.name) {
            return Err(McpError::ToolAlreadyRegistered(definition.name));
        }
        self.tools.push(RegisteredTool {
            definition,
            handler,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|t| t.definition.name == name)
    }

    /// Tool definitions in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Drop every registered tool. Test harness use only; calling this on
    /// a live registry would orphan in-flight tool calls.
    pub fn clear(&mut self) {
        self.tools.clear();
    }
}
