//! Query execution tool.
//!
//! This module implements the `execute_sql` tool body: acquire a validated
//! handle, run the statement, and render the buffered result as text.

use crate::db::{ConnectionManager, QueryExecutor};
use crate::error::DbResult;
use crate::tools::format::format_as_text;
use schemars::{JsonSchema, Schema};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Input for the execute_sql tool.
///
/// `query` is optional in Rust so a call without it still reaches the tool
/// and gets the fixed missing-parameter message; the published schema marks
/// it required.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[schemars(transform = require_query)]
pub struct QueryInput {
    /// SQL query to execute (required)
    pub query: Option<String>,
}

fn require_query(schema: &mut Schema) {
    if let Some(query) = schema
        .get_mut("properties")
        .and_then(|props| props.get_mut("query"))
        .and_then(|query| query.as_object_mut())
    {
        query.remove("nullable");
        query.remove("default");
        query.insert("type".to_string(), serde_json::json!("string"));
    }
    schema.insert("required".to_string(), serde_json::json!(["query"]));
}

/// Handler for query execution.
pub struct QueryToolHandler {
    connection_manager: Arc<ConnectionManager>,
    executor: QueryExecutor,
}

impl QueryToolHandler {
    /// Create a new query tool handler with the default timeout.
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self::with_executor(connection_manager, QueryExecutor::default())
    }

    /// Create a new query tool handler with custom executor settings.
    pub fn with_executor(
        connection_manager: Arc<ConnectionManager>,
        executor: QueryExecutor,
    ) -> Self {
        Self {
            connection_manager,
            executor,
        }
    }

    pub fn connection_manager(&self) -> &Arc<ConnectionManager> {
        &self.connection_manager
    }

    /// Run a statement against the currently configured database.
    ///
    /// Returns the rendered table or the no-rows message. Connection problems
    /// surface as `DbError::ConnectionUnavailable`.
    pub async fn run(&self, query: &str) -> DbResult<String> {
        let pool = self.connection_manager.acquire().await?;

        let start = Instant::now();
        let table = self.executor.execute(&pool, query).await?;

        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Query executed"
        );

        Ok(format_as_text(&table))
    }
}
