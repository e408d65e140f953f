//! Error types for the SQL Execute MCP Server.
//!
//! Errors stay typed all the way up to the MCP tool boundary, where they are
//! rendered as plain text and returned in-band so the calling agent always
//! gets an actionable message instead of a protocol fault.

use thiserror::Error;

/// Failure to obtain a validated database handle.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("{source_name} is not set")]
    ConfigMissing { source_name: String },

    #[error("{message}")]
    ConnectionFailed { message: String, suggestion: String },
}

impl ConnectError {
    /// Create a configuration missing error.
    pub fn config_missing(source_name: impl Into<String>) -> Self {
        Self::ConfigMissing {
            source_name: source_name.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection_failed(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::ConnectionFailed { suggestion, .. } => Some(suggestion),
            Self::ConfigMissing { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database connection unavailable: {0}")]
    ConnectionUnavailable(#[from] ConnectError),

    #[error("query execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("error during row iteration: {message}")]
    IterationFailed { message: String },

    #[error("Missing required 'query' parameter")]
    ParameterMissing,
}

impl DbError {
    /// Create an execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }

    /// Create a row iteration error.
    pub fn iteration(message: impl Into<String>) -> Self {
        Self::IterationFailed {
            message: message.into(),
        }
    }

    /// Create a timeout error. Timeouts surface as execution failures.
    pub fn timeout(operation: &str, elapsed_secs: u64) -> Self {
        Self::execution(format!("{} exceeded {}s timeout", operation, elapsed_secs))
    }

    /// Check if re-invoking the same query unchanged could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionUnavailable(ConnectError::ConnectionFailed { .. })
        )
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Failure of the protocol transport itself, outside any tool call.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to start {transport} transport: {message}")]
    Startup {
        transport: &'static str,
        message: String,
    },

    #[error("{transport} transport error: {message}")]
    Runtime {
        transport: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_missing_display() {
        let err = DbError::from(ConnectError::config_missing(
            "DATABASE_URL environment variable",
        ));
        assert_eq!(
            err.to_string(),
            "database connection unavailable: DATABASE_URL environment variable is not set"
        );
    }

    #[test]
    fn test_connection_failed_display() {
        let err = DbError::from(ConnectError::connection_failed(
            "failed to connect to database: unable to open database file",
            "Check the path",
        ));
        assert!(
            err.to_string()
                .starts_with("database connection unavailable: failed to connect")
        );
    }

    #[test]
    fn test_connect_error_suggestion() {
        let err = ConnectError::connection_failed("boom", "Check credentials");
        assert_eq!(err.suggestion(), Some("Check credentials"));
        assert_eq!(ConnectError::config_missing("X").suggestion(), None);
    }

    #[test]
    fn test_execution_and_iteration_display() {
        assert_eq!(
            DbError::execution("near \"FROM\": syntax error").to_string(),
            "query execution failed: near \"FROM\": syntax error"
        );
        assert_eq!(
            DbError::iteration("disk I/O error").to_string(),
            "error during row iteration: disk I/O error"
        );
    }

    #[test]
    fn test_parameter_missing_display() {
        assert_eq!(
            DbError::ParameterMissing.to_string(),
            "Missing required 'query' parameter"
        );
    }

    #[test]
    fn test_error_retryable() {
        assert!(DbError::from(ConnectError::connection_failed("err", "sugg")).is_retryable());
        assert!(!DbError::from(ConnectError::config_missing("DATABASE_URL")).is_retryable());
        assert!(!DbError::execution("syntax error").is_retryable());
        assert!(!DbError::ParameterMissing.is_retryable());
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Startup {
            transport: "stdio",
            message: "connection closed: initialize request".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to start stdio transport: connection closed: initialize request"
        );
    }

    #[test]
    fn test_timeout_is_execution_failure() {
        let err = DbError::timeout("query execution", 30);
        assert!(matches!(err, DbError::ExecutionFailed { .. }));
        assert_eq!(
            err.to_string(),
            "query execution failed: query execution exceeded 30s timeout"
        );
    }
}
