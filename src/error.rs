use std::error::Error as StdError;

use thiserror::Error;

use crate::dsn::DsnError;
use crate::types::Flavor;

/// Low-level cause behind a [`DbClientError`].
#[derive(Debug, Error)]
pub enum DriverError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MySql(#[from] sqlx::Error),

    #[error("timed out waiting for a pooled connection")]
    PoolTimedOut,

    #[error(transparent)]
    Runtime(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl<E: Into<DriverError>> From<bb8::RunError<E>> for DriverError {
    fn from(err: bb8::RunError<E>) -> Self {
        match err {
            bb8::RunError::User(e) => e.into(),
            bb8::RunError::TimedOut => DriverError::PoolTimedOut,
        }
    }
}

/// Errors returned by [`DbClient`](crate::DbClient).
///
/// `Display` carries the failed operation; the driver cause stays reachable
/// through [`std::error::Error::source`]. Use [`error_chain`] to render both.
#[derive(Debug, Error)]
pub enum DbClientError {
    #[error("failed to create connection string")]
    ConnectionString(#[source] DsnError),

    #[error("failed to open {flavor} database")]
    Open {
        flavor: Flavor,
        #[source]
        source: DriverError,
    },

    #[error("failed to establish connection to database")]
    Connectivity(#[source] DriverError),

    #[error("failed to get connection to database")]
    ConnectionAcquisition(#[source] DriverError),

    #[error("failed to apply session settings")]
    SessionSetup(#[source] DriverError),

    #[error("query failed")]
    QueryExecution(#[source] DriverError),

    #[error("could not determine columns")]
    ColumnRead(#[source] DriverError),

    #[error("failed to read rows")]
    RowScan(#[source] DriverError),

    #[error("failed to close database handle")]
    Teardown(#[source] DriverError),
}

/// Fieldless mirror of [`DbClientError`] for matching on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConnectionString,
    Open,
    Connectivity,
    ConnectionAcquisition,
    SessionSetup,
    QueryExecution,
    ColumnRead,
    RowScan,
    Teardown,
}

impl DbClientError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbClientError::ConnectionString(_) => ErrorKind::ConnectionString,
            DbClientError::Open { .. } => ErrorKind::Open,
            DbClientError::Connectivity(_) => ErrorKind::Connectivity,
            DbClientError::ConnectionAcquisition(_) => ErrorKind::ConnectionAcquisition,
            DbClientError::SessionSetup(_) => ErrorKind::SessionSetup,
            DbClientError::QueryExecution(_) => ErrorKind::QueryExecution,
            DbClientError::ColumnRead(_) => ErrorKind::ColumnRead,
            DbClientError::RowScan(_) => ErrorKind::RowScan,
            DbClientError::Teardown(_) => ErrorKind::Teardown,
        }
    }
}

/// Render an error and every `source()` beneath it as `outer: inner: ...`.
#[must_use]
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        // transparent wrappers repeat their inner message
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        current = cause.source();
    }
    rendered
}
