pub mod connection;
pub mod types;

pub use connection::SessionConnection;
pub use types::{CHECKOUT_TIMEOUT, DbHandle, MAX_CONNECTION_LIFETIME, MAX_OPEN_CONNECTIONS};

use bb8::ManageConnection;

use crate::error::DriverError;
use crate::types::{Flavor, HandleStatus};
use types::{pool_status, single_connection_pool};

impl DbHandle {
    /// Parse `dsn` for `flavor` and build the single-connection pool.
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    /// Returns `DriverError` if the DSN does not parse for the flavor's driver,
    /// or `DriverError::Other` if the flavor was compiled out.
    pub fn open(flavor: Flavor, dsn: &str) -> Result<Self, DriverError> {
        match flavor {
            #[cfg(feature = "postgres")]
            Flavor::Postgres => {
                let config = dsn.parse::<tokio_postgres::Config>()?;
                let manager = crate::postgres::PgManager::new(config);
                Ok(DbHandle::Postgres {
                    pool: single_connection_pool(manager.clone()),
                    manager,
                })
            }
            #[cfg(feature = "mysql")]
            Flavor::MySql => {
                let options = dsn.parse::<sqlx::mysql::MySqlConnectOptions>()?;
                let manager = crate::mysql::MySqlManager::new(options);
                Ok(DbHandle::MySql {
                    pool: single_connection_pool(manager.clone()),
                    manager,
                })
            }
            #[allow(unreachable_patterns)]
            other => Err(DriverError::Other(format!(
                "{other} support is not enabled in this build"
            ))),
        }
    }

    /// Single reachability probe: dial one connection outside the pool,
    /// check it, and drop it.
    ///
    /// # Errors
    /// Returns the driver error from the dial or the liveness check.
    pub async fn ping(&self) -> Result<(), DriverError> {
        match self {
            #[cfg(feature = "postgres")]
            DbHandle::Postgres { manager, .. } => probe(manager).await,
            #[cfg(feature = "mysql")]
            DbHandle::MySql { manager, .. } => probe(manager).await,
        }
    }

    /// Check the pool's only connection out, dialing if none is idle.
    ///
    /// # Errors
    /// Returns `DriverError` if no connection could be produced before
    /// [`CHECKOUT_TIMEOUT`].
    pub async fn acquire(&self) -> Result<SessionConnection, DriverError> {
        match self {
            #[cfg(feature = "postgres")]
            DbHandle::Postgres { pool, .. } => {
                Ok(SessionConnection::Postgres(pool.get_owned().await?))
            }
            #[cfg(feature = "mysql")]
            DbHandle::MySql { pool, .. } => Ok(SessionConnection::MySql(pool.get_owned().await?)),
        }
    }

    #[must_use]
    pub fn status(&self) -> HandleStatus {
        match self {
            #[cfg(feature = "postgres")]
            DbHandle::Postgres { pool, .. } => pool_status(pool),
            #[cfg(feature = "mysql")]
            DbHandle::MySql { pool, .. } => pool_status(pool),
        }
    }

    #[must_use]
    pub fn flavor(&self) -> Flavor {
        match self {
            #[cfg(feature = "postgres")]
            DbHandle::Postgres { .. } => Flavor::Postgres,
            #[cfg(feature = "mysql")]
            DbHandle::MySql { .. } => Flavor::MySql,
        }
    }

    /// Close the pool, dropping its idle connection.
    ///
    /// # Errors
    /// Returns `DriverError::Other` if connections are still checked out: they
    /// outlive the handle and would leak their sessions.
    pub fn close(self) -> Result<(), DriverError> {
        let status = self.status();
        if status.in_use() > 0 {
            return Err(DriverError::Other(format!(
                "{} connection(s) still checked out",
                status.in_use()
            )));
        }
        drop(self);
        Ok(())
    }
}

async fn probe<M>(manager: &M) -> Result<(), DriverError>
where
    M: ManageConnection,
    M::Error: Into<DriverError>,
{
    let mut conn = manager.connect().await.map_err(Into::into)?;
    manager.is_valid(&mut conn).await.map_err(Into::into)
}
