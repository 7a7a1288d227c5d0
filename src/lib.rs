//! Single-session SQL client for `MySQL` and Postgres.
//!
//! A [`DbClient`] owns a driver handle pinned to one connection, keeps that
//! connection cached between queries, and turns every result into ordered
//! column names plus rows of display text, with SQL NULL rendered as
//! [`NULL_MARKER`].

#[cfg(not(any(feature = "postgres", feature = "mysql")))]
compile_error!("enable at least one of the `postgres` or `mysql` features");

pub mod blocking;
pub mod client;
pub mod config;
pub mod dsn;
pub mod error;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod pool;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod prelude;
pub mod results;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use blocking::BlockingDbClient;
pub use client::DbClient;
pub use config::ConnectionConfig;
pub use dsn::{DsnError, DsnProducer};
pub use error::{DbClientError, DriverError, ErrorKind, error_chain};
pub use results::{NULL_MARKER, QueryResult};
pub use types::{Flavor, HandleStatus};
