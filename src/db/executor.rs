//! Query execution engine.
//!
//! Runs a single statement under a timeout and buffers the complete result
//! into a [`ResultTable`]. There is no row limit: large results are held in
//! memory in full before they are rendered.

use crate::config::DEFAULT_QUERY_TIMEOUT_SECS;
use crate::db::types::{column_names, row_to_strings};
use crate::error::{DbError, DbResult};
use crate::models::ResultTable;
use futures_util::StreamExt;
use sqlx::{Executor, SqlitePool};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// Query executor that handles database query execution.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    query_timeout: Duration,
}

impl QueryExecutor {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Execute a statement and buffer every returned row.
    ///
    /// A driver error before the first row is an execution failure. SQLite
    /// prepares and takes its first step lazily, so this covers syntax errors
    /// and also runtime errors raised on the first step. An error after rows
    /// started arriving, or a cell that cannot be read, is an iteration
    /// failure. Exceeding the timeout cancels the statement and discards any
    /// rows read so far.
    pub async fn execute(&self, pool: &SqlitePool, sql: &str) -> DbResult<ResultTable> {
        let start = Instant::now();

        debug!(
            sql = %sql,
            timeout_secs = self.query_timeout.as_secs(),
            "Executing query"
        );

        let fetch = async {
            let mut stream = pool.fetch(sql);
            let mut table: Option<ResultTable> = None;

            while let Some(item) = stream.next().await {
                let row = match item {
                    Ok(row) => row,
                    Err(e) if table.is_none() => return Err(DbError::execution(e.to_string())),
                    Err(e) => return Err(DbError::iteration(e.to_string())),
                };

                let current = table.get_or_insert_with(|| ResultTable::new(column_names(&row)));
                let cells = row_to_strings(&row)
                    .map_err(|e| DbError::iteration(format!("failed to scan row: {}", e)))?;
                current.push_row(cells)?;
            }

            Ok(table.unwrap_or_default())
        };

        let table = match timeout(self.query_timeout, fetch).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(DbError::timeout(
                    "query execution",
                    self.query_timeout.as_secs(),
                ));
            }
        };

        debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Query completed"
        );

        Ok(table)
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[test]
    fn test_executor_defaults() {
        let executor = QueryExecutor::default();
        assert_eq!(
            executor.query_timeout(),
            Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS)
        );
    }

    #[tokio::test]
    async fn test_execute_buffers_all_rows() {
        let pool = memory_pool().await;
        let table = QueryExecutor::default()
            .execute(
                &pool,
                "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 2500) \
                 SELECT x, 'row ' || x AS label FROM c",
            )
            .await
            .unwrap();

        assert_eq!(table.columns(), &["x", "label"]);
        assert_eq!(table.row_count(), 2500);
        assert_eq!(table.rows()[2499], vec!["2500", "row 2500"]);
        assert_eq!(table.widths(), &[4, 8]);
    }

    #[tokio::test]
    async fn test_statement_without_rows_yields_empty_table() {
        let pool = memory_pool().await;
        let table = QueryExecutor::default()
            .execute(&pool, "CREATE TABLE t (id INTEGER)")
            .await
            .unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_syntax_error_is_execution_failure() {
        let pool = memory_pool().await;
        let err = QueryExecutor::default()
            .execute(&pool, "SELECT FROM WHERE INVALID SYNTAX")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("syntax error"));
    }

    #[tokio::test]
    async fn test_missing_table_is_execution_failure() {
        let pool = memory_pool().await;
        let err = QueryExecutor::default()
            .execute(&pool, "SELECT * FROM no_such_table")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("no such table"));
    }

    #[tokio::test]
    async fn test_first_step_runtime_error_is_execution_failure() {
        let pool = memory_pool().await;
        let err = QueryExecutor::default()
            .execute(&pool, "SELECT abs(-9223372036854775807 - 1)")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("integer overflow"));
    }

    #[tokio::test]
    async fn test_timeout_is_execution_failure() {
        let pool = memory_pool().await;
        let executor = QueryExecutor::new(Duration::from_millis(50));
        let err = executor
            .execute(
                &pool,
                "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 20000000) \
                 SELECT count(*) FROM c",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("timeout"));
    }
}
