//! MCP server integration module.
//!
//! Binds the query tool handler to the MCP protocol using the rmcp framework.

pub mod service;

pub use service::SqlService;
