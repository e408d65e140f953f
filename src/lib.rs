//! SQL Execute MCP Server Library
//!
//! An MCP (Model Context Protocol) server with one tool, `execute_sql`, that
//! runs a statement against a SQLite database and returns the rows as an
//! aligned plain-text table. The connection follows its environment variable:
//! it is opened lazily and reopened whenever the configured URL changes.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{ConnectError, DbError};
pub use mcp::SqlService;
