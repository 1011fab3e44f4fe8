//! Built-in DoorPasses tools.

pub mod connections;
pub mod whoami;

use std::sync::Arc;

use sqlx::PgPool;

use crate::registry::{McpError, ToolRegistry};

/// JSON schema for a tool's parameter struct.
pub(crate) fn input_schema<T: schemars::JsonSchema>() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default()
}

/// Register the built-in tools. Called once at startup; a duplicate name
/// here is a configuration bug and aborts boot.
pub fn register_builtin_tools(
    registry: &mut ToolRegistry,
    pool: &PgPool,
) -> Result<(), McpError> {
    registry.register(whoami::definition(), Arc::new(whoami::WhoamiTool))?;
    registry.register(
        connections::definition(),
        Arc::new(connections::ListConnectionsTool::new(pool.clone())),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests;
