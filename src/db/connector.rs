//! Driver seam for the connection manager.
//!
//! The manager only needs to open, health-check and close a handle. Keeping
//! those three operations behind [`Connector`] lets the reconnect state
//! machine run against a fake driver in tests.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection, SqlitePool};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};

/// Opens, validates and closes database handles.
pub trait Connector: Send + Sync + 'static {
    /// Cheaply cloneable handle shared by concurrent queries.
    type Handle: Clone + Send + Sync + 'static;

    /// Build a handle for the configuration string without touching the network.
    fn open(&self, config: &str) -> Result<Self::Handle, sqlx::Error>;

    /// Round-trip to the database to prove the handle is usable.
    fn ping(&self, handle: &Self::Handle) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    /// Release the handle and every connection it owns.
    fn close(&self, handle: &Self::Handle) -> impl Future<Output = ()> + Send;

    /// Generate a helpful suggestion for connection errors.
    fn suggestion(&self, error: &sqlx::Error) -> String {
        let error_str = error.to_string().to_lowercase();

        if error_str.contains("connection refused") {
            return "Check that the database server is running and accessible".to_string();
        }

        if error_str.contains("authentication") || error_str.contains("password") {
            return "Verify the username and password in the connection string".to_string();
        }

        if error_str.contains("does not exist") || error_str.contains("unknown database") {
            return "Check that the database name exists".to_string();
        }

        "Verify the connection string".to_string()
    }
}

/// SQLite driver backed by an `sqlx` pool.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    max_connections: u32,
    acquire_timeout: Duration,
}

impl SqliteConnector {
    pub fn new(max_connections: u32, acquire_timeout: Duration) -> Self {
        Self {
            max_connections: max_connections.max(1),
            acquire_timeout,
        }
    }
}

impl Default for SqliteConnector {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_CONNECTIONS,
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }
}

impl Connector for SqliteConnector {
    type Handle = SqlitePool;

    fn open(&self, config: &str) -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(config)?;
        let pool = SqlitePoolOptions::new()
            .min_connections(0)
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect_lazy_with(options);
        Ok(pool)
    }

    async fn ping(&self, handle: &SqlitePool) -> Result<(), sqlx::Error> {
        let mut conn = handle.acquire().await?;
        conn.ping().await
    }

    async fn close(&self, handle: &SqlitePool) {
        handle.close().await;
    }

    fn suggestion(&self, error: &sqlx::Error) -> String {
        let error_str = error.to_string().to_lowercase();

        if error_str.contains("unable to open") || error_str.contains("no such file") {
            return "Check that the database file exists and is readable: sqlite:path/to/db.sqlite"
                .to_string();
        }

        if error_str.contains("not a database") {
            return "The file exists but is not a SQLite database".to_string();
        }

        if error_str.contains("locked") || error_str.contains("busy") {
            return "Another process holds a lock on the database; retry later".to_string();
        }

        "Verify the connection string format: sqlite:path/to/db.sqlite or sqlite::memory:"
            .to_string()
    }
}
