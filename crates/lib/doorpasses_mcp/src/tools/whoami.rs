//! `whoami` tool — reports the authenticated scope of the connection.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::McpContext;
use crate::registry::{ToolError, ToolHandler};
use crate::types::ToolDefinition;

/// Parameters for the `whoami` tool. Takes none.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WhoamiRequest {}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "whoami".to_string(),
        description: "Show the user, organization, and client behind this connection".to_string(),
        input_schema: super::input_schema::<WhoamiRequest>(),
    }
}

pub struct WhoamiTool;

#[async_trait]
impl ToolHandler for WhoamiTool {
    async fn call(&self, context: &McpContext, _arguments: Value) -> Result<Value, ToolError> {
        Ok(json!({
            "userId": context.user_id,
            "organizationId": context.organization_id,
            "clientName": context.client_name,
        }))
    }
}
