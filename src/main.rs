//! SQL Execute MCP Server - Main entry point.
//!
//! Serves a single `execute_sql` tool over stdio. The database URL is read
//! from an environment variable on every call, so the server starts even when
//! it is unset.

use sql_execute_mcp::config::{Config, ConfigProvider};
use sql_execute_mcp::db::{ConnectionManager, QueryExecutor, SqliteConnector};
use sql_execute_mcp::tools::QueryToolHandler;
use sql_execute_mcp::transport::{StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs always go to stderr; stdout carries the protocol.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();

    if config.enable_logs {
        init_tracing(&config);
    }

    info!(
        config_env = %config.config_env,
        query_timeout_secs = config.query_timeout,
        "Starting SQL Execute MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let provider = config.config_provider();
    if provider.current_config().is_empty() {
        // Not fatal: the variable may be set before the first query
        warn!(
            source = %provider.source_name(),
            "Database configuration is not set yet"
        );
    }

    let connector = SqliteConnector::new(config.max_connections, config.connect_timeout_duration());
    let connection_manager = Arc::new(
        ConnectionManager::new(connector, Arc::new(provider))
            .with_health_check_timeout(config.connect_timeout_duration()),
    );
    let query_handler = Arc::new(QueryToolHandler::with_executor(
        connection_manager,
        QueryExecutor::new(config.query_timeout_duration()),
    ));

    let transport = StdioTransport::new(query_handler);
    info!(transport = transport.name(), "Using stdio transport");

    if let Err(e) = transport.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
