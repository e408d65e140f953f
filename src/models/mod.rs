//! Data models for the SQL Execute MCP Server.

pub mod table;

pub use table::ResultTable;
