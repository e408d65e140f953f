//! MCP tool implementations.
//!
//! - `query`: the `execute_sql` tool body
//! - `format`: plain-text rendering of query results

pub mod format;
pub mod query;

pub use format::{NO_ROWS_MESSAGE, format_as_text};
pub use query::{QueryInput, QueryToolHandler};
