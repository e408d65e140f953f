//! Database access layer.
//!
//! - `connector`: driver seam (open, ping, close)
//! - `manager`: lazily-initialized handle that follows configuration changes
//! - `executor`: timed statement execution into a buffered table
//! - `types`: SQLite value to text conversion

pub mod connector;
pub mod executor;
pub mod manager;
pub mod types;

pub use connector::{Connector, SqliteConnector};
pub use executor::QueryExecutor;
pub use manager::ConnectionManager;
