//! MCP service implementation using rmcp.
//!
//! This module defines the SqlService struct exposing the single `execute_sql`
//! tool. Every outcome, failures included, is returned as text content so the
//! calling agent can read and react to it.

use crate::db::ConnectionManager;
use crate::error::DbError;
use crate::tools::query::{QueryInput, QueryToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct SqlService {
    /// Shared query handler backed by the connection manager
    query_handler: Arc<QueryToolHandler>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl SqlService {
    /// Create a new SqlService around an existing query handler.
    pub fn new(query_handler: Arc<QueryToolHandler>) -> Self {
        Self {
            query_handler,
            tool_router: Self::tool_router(),
        }
    }

    /// Create a service with the default executor for `connection_manager`.
    pub fn from_manager(connection_manager: Arc<ConnectionManager>) -> Self {
        Self::new(Arc::new(QueryToolHandler::new(connection_manager)))
    }
}

#[tool_router]
impl SqlService {
    #[tool(
        description = "Execute SQL query on the configured SQLite database.\nReturns results as a plain-text table with aligned columns, or a message when no rows are returned.\nThe database connection is read from the environment on every call and reopened when it changes."
    )]
    async fn execute_sql(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let Some(query) = input.query else {
            warn!("execute_sql called without a query");
            return Ok(CallToolResult::error(vec![Content::text(
                DbError::ParameterMissing.to_string(),
            )]));
        };

        match self.query_handler.run(&query).await {
            Ok(output) => Ok(CallToolResult::success(vec![Content::text(output)])),
            Err(e) => {
                warn!(
                    error = %e,
                    retryable = e.is_retryable(),
                    "Query failed"
                );
                if let DbError::ConnectionUnavailable(inner) = &e {
                    if let Some(suggestion) = inner.suggestion() {
                        warn!(suggestion = %suggestion, "Connection hint");
                    }
                }
                Ok(CallToolResult::success(vec![Content::text(format!(
                    "Error: {}",
                    e
                ))]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for SqlService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sql-execute-mcp".to_owned(),
                title: Some("SQL Execute MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Run SQL against the configured SQLite database with `execute_sql`.\n\
                \n\
                - Pass the statement in the `query` argument.\n\
                - Results come back as a plain-text table: a header line, a dashed separator, \
                then one line per row. Columns are separated by at least two spaces.\n\
                - NULL values render as empty cells.\n\
                - Failures are reported as text starting with `Error:`. If the database \
                connection is unavailable, fix the connection environment variable and retry."
                    .to_string(),
            ),
        }
    }
}
