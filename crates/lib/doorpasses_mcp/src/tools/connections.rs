//! `list_connections` tool — the caller's authorized MCP connections
//! within the current organization.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgPool;

use doorpasses_core::oauth::authorizations;

use crate::auth::McpContext;
use crate::registry::{ToolError, ToolHandler};
use crate::types::ToolDefinition;

/// Parameters for the `list_connections` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListConnectionsRequest {
    /// Include revoked connections. Defaults to false.
    pub include_inactive: Option<bool>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "list_connections".to_string(),
        description: "List MCP client connections authorized by this user in the organization"
            .to_string(),
        input_schema: super::input_schema::<ListConnectionsRequest>(),
    }
}

pub struct ListConnectionsTool {
    pool: PgPool,
}

impl ListConnectionsTool {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolHandler for ListConnectionsTool {
    async fn call(&self, context: &McpContext, arguments: Value) -> Result<Value, ToolError> {
        let request: ListConnectionsRequest = if arguments.is_null() {
            ListConnectionsRequest::default()
        } else {
            serde_json::from_value(arguments)?
        };

        let mut rows = authorizations::list(
            &self.pool,
            context.user_id,
            Some(context.organization_id),
        )
        .await?;

        if !request.include_inactive.unwrap_or(false) {
            rows.retain(|a| a.is_active);
        }

        Ok(json!({"connections": rows}))
    }
}
