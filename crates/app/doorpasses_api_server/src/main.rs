//! DoorPasses API server binary.
//!
//! Serves the OAuth authorization endpoints and the MCP endpoint on a
//! single port. Prints `{"port": N}` to stdout so supervisors that bind
//! port 0 can discover the bound port.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use doorpasses_core::oauth::cleanup;
use doorpasses_core::oauth::codes::AuthCodeCache;
use doorpasses_mcp::registry::ToolRegistry;
use doorpasses_mcp::tools::register_builtin_tools;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "doorpasses_api_server", about = "DoorPasses API server")]
struct Args {
    /// Address to bind the HTTP listener (use port 0 for an ephemeral port).
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3100")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/doorpasses"
    )]
    database_url: String,

    /// Public base URL advertised as the OAuth issuer in the discovery
    /// document.
    #[arg(long, env = "ISSUER_URL", default_value = "http://127.0.0.1:3100")]
    issuer_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Write logs to stderr so stdout is reserved for the JSON port message.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,doorpasses_api=debug,doorpasses_core=debug"
                    .parse()
                    .unwrap()
            }),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, bind_addr = %args.bind_addr, "starting doorpasses_api_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    // Run database migrations.
    info!("running database migrations");
    doorpasses_api::migrate(&pool).await?;

    let config = doorpasses_api::config::ApiConfig {
        bind_addr: args.bind_addr,
        pg_connection_url: args.database_url,
        issuer_url: args.issuer_url,
    };

    // Authorization codes live in process memory; expired entries are
    // purged in the background. Expired DB tokens get a nightly sweep.
    let codes = Arc::new(AuthCodeCache::in_memory());
    codes.spawn_cleanup_task();
    cleanup::spawn_sweep_task(pool.clone());

    let mut registry = ToolRegistry::new();
    register_builtin_tools(&mut registry, &pool)?;
    info!(tools = registry.len(), "registered MCP tools");

    let state = doorpasses_api::AppState {
        pool: pool.clone(),
        config: config.clone(),
        codes,
    };

    let app = doorpasses_api::router(state)
        .merge(doorpasses_mcp::mcp_router(pool, Arc::new(registry)));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    // Report the bound port as JSON on stdout so a supervisor can read it.
    println!("{}", serde_json::json!({"port": local_addr.port()}));

    info!(addr = %local_addr, "DoorPasses API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
