#[cfg(any(feature = "postgres", feature = "mysql"))]
use bb8::PooledConnection;

use crate::error::{DbClientError, DriverError};
#[cfg(feature = "mysql")]
use crate::mysql::MySqlManager;
#[cfg(feature = "postgres")]
use crate::postgres::PgManager;
use crate::results::RawRowSet;
use crate::types::Flavor;

/// The one connection checked out of a [`DbHandle`](super::DbHandle).
///
/// Dropping it hands the connection back to the pool, which discards it on
/// the next checkout if it no longer answers.
pub enum SessionConnection {
    #[cfg(feature = "postgres")]
    Postgres(PooledConnection<'static, PgManager>),
    #[cfg(feature = "mysql")]
    MySql(PooledConnection<'static, MySqlManager>),
}

impl std::fmt::Debug for SessionConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionConnection")
            .field(&self.flavor())
            .finish()
    }
}

impl SessionConnection {
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        match self {
            #[cfg(feature = "postgres")]
            SessionConnection::Postgres(_) => Flavor::Postgres,
            #[cfg(feature = "mysql")]
            SessionConnection::MySql(_) => Flavor::MySql,
        }
    }

    /// Lightweight liveness probe.
    ///
    /// # Errors
    /// Returns the driver error if the server does not answer.
    pub async fn ping(&mut self) -> Result<(), DriverError> {
        match self {
            #[cfg(feature = "postgres")]
            SessionConnection::Postgres(client) => {
                Ok(crate::postgres::manager::ping(client).await?)
            }
            #[cfg(feature = "mysql")]
            SessionConnection::MySql(conn) => {
                use sqlx::Connection;
                Ok(conn.ping().await?)
            }
        }
    }

    /// Run a statement whose result is not needed (session setup).
    ///
    /// # Errors
    /// Returns the driver error if the statement fails.
    pub async fn execute(&mut self, sql: &str) -> Result<(), DriverError> {
        match self {
            #[cfg(feature = "postgres")]
            SessionConnection::Postgres(client) => Ok(client.batch_execute(sql).await?),
            #[cfg(feature = "mysql")]
            SessionConnection::MySql(conn) => {
                sqlx::raw_sql(sql).execute(&mut **conn).await?;
                Ok(())
            }
        }
    }

    pub(crate) async fn fetch_text(
        &mut self,
        sql: &str,
    ) -> Result<Option<RawRowSet>, DbClientError> {
        match self {
            #[cfg(feature = "postgres")]
            SessionConnection::Postgres(client) => crate::postgres::fetch_text(client, sql).await,
            #[cfg(feature = "mysql")]
            SessionConnection::MySql(conn) => crate::mysql::fetch_text(conn, sql).await,
        }
    }
}
