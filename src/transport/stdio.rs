//! Stdio transport for the MCP server.
//!
//! Reads JSON-RPC messages from stdin and writes responses to stdout. Stdout
//! belongs to the protocol, so nothing else may print to it.

use crate::db::ConnectionManager;
use crate::error::TransportError;
use crate::mcp::SqlService;
use crate::tools::QueryToolHandler;
use crate::transport::Transport;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

const NAME: &str = "stdio";

/// Stdio transport implementation.
pub struct StdioTransport {
    query_handler: Arc<QueryToolHandler>,
}

impl StdioTransport {
    pub fn new(query_handler: Arc<QueryToolHandler>) -> Self {
        Self { query_handler }
    }

    fn connection_manager(&self) -> &Arc<ConnectionManager> {
        self.query_handler.connection_manager()
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> Result<(), TransportError> {
        info!("Starting MCP server with stdio transport");

        let service = SqlService::new(self.query_handler.clone());

        let running_service =
            service
                .serve(stdio())
                .await
                .map_err(|e| TransportError::Startup {
                    transport: NAME,
                    message: e.to_string(),
                })?;

        let (shutdown_requested, outcome) = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(quit_reason) => {
                        info!(reason = ?quit_reason, "Stdio transport completed normally");
                        (false, Ok(()))
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        (false, Err(TransportError::Runtime {
                            transport: NAME,
                            message: e.to_string(),
                        }))
                    }
                }
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received (send again to force exit)");
                (true, Ok(()))
            }
        };

        if shutdown_requested {
            tokio::spawn(async {
                wait_for_signal().await;
                warn!("Received second signal, forcing immediate exit");
                std::process::exit(1);
            });
        }

        // The handle is released on every exit path, errors included
        info!("Closing database connection");
        self.connection_manager().close().await;

        if shutdown_requested {
            // stdin reads cannot be interrupted by select!
            info!("Exiting process");
            std::process::exit(0);
        }

        outcome
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
///
/// If a handler cannot be installed, that signal is simply never observed.
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }
}
