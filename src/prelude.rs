//! Convenient imports for common functionality.
//!
//! This module re-exports the types most callers need to open a client and
//! read its results.

pub use crate::blocking::BlockingDbClient;
pub use crate::client::DbClient;
pub use crate::config::ConnectionConfig;
pub use crate::dsn::{DsnError, DsnProducer};
pub use crate::error::{DbClientError, DriverError, ErrorKind, error_chain};
pub use crate::results::{NULL_MARKER, QueryResult};
pub use crate::types::{Flavor, HandleStatus};
