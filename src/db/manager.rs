//! Lazily-initialized, reconnect-on-change connection management.
//!
//! The manager holds at most one validated handle, keyed by the configuration
//! string it was opened with. Every [`ConnectionManager::acquire`] re-reads the
//! configuration from the injected [`ConfigProvider`]; a changed string closes
//! the old handle and opens a new one.

use crate::config::{ConfigProvider, DEFAULT_CONNECT_TIMEOUT_SECS, redact_connection_string};
use crate::db::connector::{Connector, SqliteConnector};
use crate::error::ConnectError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Connection state guarded by the manager's lock.
///
/// `handle` is only `Some` after a successful health-check against `source`.
#[derive(Debug)]
struct ConnectionState<H> {
    handle: Option<H>,
    source: String,
}

impl<H: Clone> ConnectionState<H> {
    fn validated_for(&self, config: &str) -> Option<H> {
        match &self.handle {
            Some(handle) if self.source == config => Some(handle.clone()),
            _ => None,
        }
    }
}

pub struct ConnectionManager<C: Connector = SqliteConnector> {
    connector: C,
    provider: Arc<dyn ConfigProvider>,
    state: RwLock<ConnectionState<C::Handle>>,
    health_check_timeout: Duration,
}

impl<C: Connector> std::fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("source", &self.provider.source_name())
            .field("health_check_timeout", &self.health_check_timeout)
            .finish_non_exhaustive()
    }
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager that reads its configuration from `provider`.
    ///
    /// No connection is opened until the first [`acquire`](Self::acquire).
    pub fn new(connector: C, provider: Arc<dyn ConfigProvider>) -> Self {
        Self {
            connector,
            provider,
            state: RwLock::new(ConnectionState {
                handle: None,
                source: String::new(),
            }),
            health_check_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Bound the health-check performed after opening a new handle.
    pub fn with_health_check_timeout(mut self, health_check_timeout: Duration) -> Self {
        self.health_check_timeout = health_check_timeout;
        self
    }

    /// Get a validated handle for the current configuration.
    ///
    /// Returns the existing handle when the configuration is unchanged.
    /// Otherwise the old handle is closed and a new one is opened and pinged.
    pub async fn acquire(&self) -> Result<C::Handle, ConnectError> {
        let current = self.provider.current_config();

        {
            let state = self.state.read().await;
            if let Some(handle) = state.validated_for(&current) {
                return Ok(handle);
            }
        } // Read lock released here

        let mut state = self.state.write().await;

        // Another caller may have reconnected while we waited for the lock
        if let Some(handle) = state.validated_for(&current) {
            debug!("Reusing connection opened by a concurrent caller");
            return Ok(handle);
        }

        if let Some(stale) = state.handle.take() {
            info!(
                previous = %redact_connection_string(&state.source),
                "Database configuration changed, closing previous connection"
            );
            self.connector.close(&stale).await;
        }

        state.source = current.clone();

        if current.is_empty() {
            let source_name = self.provider.source_name();
            warn!(source = %source_name, "Database configuration is missing");
            return Err(ConnectError::config_missing(source_name));
        }

        let redacted = redact_connection_string(&current);
        info!(target_db = %redacted, "Opening database connection");

        let handle = self.connector.open(&current).map_err(|e| {
            warn!(target_db = %redacted, error = %e, "Failed to open database connection");
            ConnectError::connection_failed(
                format!("failed to open database connection: {}", e),
                self.connector.suggestion(&e),
            )
        })?;

        let health = timeout(self.health_check_timeout, self.connector.ping(&handle)).await;
        let failure = match health {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(ConnectError::connection_failed(
                format!("failed to connect to database: {}", e),
                self.connector.suggestion(&e),
            )),
            Err(_) => Some(ConnectError::connection_failed(
                format!(
                    "failed to connect to database: health check exceeded {}s",
                    self.health_check_timeout.as_secs()
                ),
                "Check that the database is reachable and not locked by another process",
            )),
        };

        if let Some(err) = failure {
            self.connector.close(&handle).await;
            warn!(
                target_db = %redacted,
                error = %err,
                suggestion = err.suggestion().unwrap_or_default(),
                "Database health check failed"
            );
            return Err(err);
        }

        state.handle = Some(handle.clone());
        info!(target_db = %redacted, "Connected successfully");
        Ok(handle)
    }

    /// Close the current handle, if any. Safe to call repeatedly.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        if let Some(handle) = state.handle.take() {
            self.connector.close(&handle).await;
            info!("Database connection closed");
        }
    }

    /// Whether a validated handle is currently held.
    pub async fn is_connected(&self) -> bool {
        self.state.read().await.handle.is_some()
    }

    /// Configuration string recorded by the last reconnect attempt.
    pub async fn current_source(&self) -> String {
        self.state.read().await.source.clone()
    }
}
