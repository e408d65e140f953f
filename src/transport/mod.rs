//! Transport layer for the MCP server.
//!
//! Only standard input/output is supported; the trait keeps the entry point
//! independent of how the service is driven.

pub mod stdio;

pub use stdio::StdioTransport;

use crate::error::TransportError;
use std::future::Future;

/// Trait for MCP transport implementations.
pub trait Transport: Send + Sync {
    /// Serve requests until the client disconnects or a shutdown signal arrives.
    fn run(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Get the name of this transport for logging.
    fn name(&self) -> &'static str;
}
