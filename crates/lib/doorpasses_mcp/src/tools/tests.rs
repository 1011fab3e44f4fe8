use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;

use doorpasses_core::uuid::uuidv7;

use crate::auth::McpContext;
use crate::registry::{ToolHandler, ToolRegistry};
use crate::tools::{connections, register_builtin_tools, whoami};

fn context() -> McpContext {
    McpContext {
        user_id: uuidv7(),
        organization_id: uuidv7(),
        authorization_id: uuidv7(),
        client_name: "Claude Desktop".to_string(),
    }
}

fn lazy_pool() -> sqlx::PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/doorpasses")
        .expect("lazy pool")
}

#[tokio::test]
async fn whoami_reports_the_authenticated_scope() {
    let ctx = context();
    let result = whoami::WhoamiTool.call(&ctx, Value::Null).await.unwrap();

    assert_eq!(result["userId"], json!(ctx.user_id));
    assert_eq!(result["organizationId"], json!(ctx.organization_id));
    assert_eq!(result["clientName"], "Claude Desktop");
}

#[test]
fn definitions_carry_object_schemas() {
    for definition in [whoami::definition(), connections::definition()] {
        assert!(!definition.name.is_empty());
        assert!(!definition.description.is_empty());
        assert!(
            definition.input_schema.is_object(),
            "{} schema should be an object",
            definition.name
        );
    }
}

#[test]
fn list_connections_schema_uses_camel_case_params() {
    let schema = connections::definition().input_schema;
    let properties = schema["properties"].as_object().expect("properties");
    assert!(properties.contains_key("includeInactive"));
    assert!(!properties.contains_key("include_inactive"));
}

#[test]
fn list_connections_request_parses_camel_case() {
    let request: connections::ListConnectionsRequest =
        serde_json::from_value(json!({"includeInactive": true})).unwrap();
    assert_eq!(request.include_inactive, Some(true));
}

#[tokio::test]
async fn builtin_tools_register_in_order() {
    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry, &lazy_pool()).unwrap();

    let names: Vec<String> = registry
        .definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["whoami", "list_connections"]);
}

#[tokio::test]
async fn builtin_tools_cannot_register_twice() {
    let mut registry = ToolRegistry::new();
    let pool = lazy_pool();
    register_builtin_tools(&mut registry, &pool).unwrap();

    let err = register_builtin_tools(&mut registry, &pool).unwrap_err();
    assert_eq!(err.to_string(), "Tool already registered: whoami");
}
