use tracing::{debug, info, warn};

use crate::dsn::DsnProducer;
use crate::error::DbClientError;
use crate::pool::{DbHandle, SessionConnection};
use crate::results::QueryResult;
use crate::types::{Flavor, HandleStatus};

/// Query client that keeps one database session alive across calls.
///
/// The underlying handle is a pool capped at one connection. The client
/// checks that connection out, caches it, and probes it before every query;
/// a dead connection is replaced and the session settings are applied again.
///
/// Every operation takes `&mut self`: one client is one session and must not
/// be shared between concurrent callers.
///
/// ```no_run
/// use sql_session::prelude::*;
///
/// # async fn run() -> Result<(), DbClientError> {
/// let cfg = ConnectionConfig::from_url(Flavor::MySql, "mysql://root@localhost:3306/app");
/// let mut client = DbClient::connect(cfg).await?;
///
/// if let Some(result) = client.query("SELECT 1 AS a, NULL AS b").await? {
///     assert_eq!(result.columns(), ["a", "b"]);
///     assert_eq!(result.rows()[0]["b"], "NULL");
/// }
///
/// client.destroy().await?;
/// # Ok(())
/// # }
/// ```
pub struct DbClient {
    handle: DbHandle,
    conn: Option<SessionConnection>,
    dsn_producer: Box<dyn DsnProducer>,
}

impl std::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbClient")
            .field("handle", &self.handle)
            .field("cached", &self.conn.is_some())
            .finish_non_exhaustive()
    }
}

impl DbClient {
    /// Open the handle for the producer's flavor and verify the database is
    /// reachable with a single probe.
    ///
    /// # Errors
    /// `ConnectionString` if the DSN cannot be derived, `Open` if the driver
    /// rejects it, `Connectivity` if the probe fails. No retry is attempted.
    pub async fn connect(dsn_producer: impl DsnProducer + 'static) -> Result<Self, DbClientError> {
        let dsn = dsn_producer
            .to_dsn()
            .map_err(DbClientError::ConnectionString)?;
        let flavor = dsn_producer.flavor();

        let handle =
            DbHandle::open(flavor, &dsn).map_err(|source| DbClientError::Open { flavor, source })?;
        handle.ping().await.map_err(DbClientError::Connectivity)?;

        info!(%flavor, safe_mode = dsn_producer.is_safe_mode(), "database client connected");
        Ok(Self {
            handle,
            conn: None,
            dsn_producer: Box::new(dsn_producer),
        })
    }

    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.handle.flavor()
    }

    /// Open and idle connection counts of the underlying handle.
    #[must_use]
    pub fn handle_status(&self) -> HandleStatus {
        self.handle.status()
    }

    /// Run raw SQL on the cached session and materialize every cell as text.
    ///
    /// Returns `Ok(None)` when the statement succeeded without producing a
    /// row set (DDL, DML without `RETURNING`); that is not an error and not an
    /// empty result. SQL NULL cells become [`NULL_MARKER`](crate::NULL_MARKER).
    /// Partial results are never returned.
    ///
    /// # Errors
    /// Connection errors from acquiring the session, `QueryExecution` for a
    /// rejected statement, `ColumnRead` / `RowScan` for materialization
    /// failures.
    pub async fn query(&mut self, sql: &str) -> Result<Option<QueryResult>, DbClientError> {
        let conn = self.connection().await?;
        debug!(sql, "running query");

        let Some(raw) = conn.fetch_text(sql).await? else {
            debug!("statement returned no row set");
            return Ok(None);
        };
        let result = raw.materialize();
        debug!(rows = result.len(), columns = result.columns().len(), "query finished");
        Ok(Some(result))
    }

    /// Release the cached session, then close the handle.
    ///
    /// Consumes the client. Releasing the cached connection cannot fail;
    /// closing the handle can.
    ///
    /// # Errors
    /// `Teardown` if the handle still has connections checked out.
    pub async fn destroy(mut self) -> Result<(), DbClientError> {
        // the connection may already be dead; dropping it is all that's left to do
        drop(self.conn.take());
        self.handle.close().map_err(DbClientError::Teardown)?;
        info!("database client closed");
        Ok(())
    }

    // Reuse the cached session when it still answers; otherwise check out a
    // fresh one and re-apply the session settings before caching it.
    async fn connection(&mut self) -> Result<&mut SessionConnection, DbClientError> {
        if let Some(mut cached) = self.conn.take() {
            match cached.ping().await {
                Ok(()) => return Ok(self.conn.insert(cached)),
                Err(e) => {
                    warn!(error = %e, "cached connection failed liveness check, replacing it");
                    drop(cached);
                }
            }
        }

        let mut fresh = self
            .handle
            .acquire()
            .await
            .map_err(DbClientError::ConnectionAcquisition)?;
        debug!(flavor = %fresh.flavor(), "checked out a fresh connection");

        if self.dsn_producer.is_safe_mode() {
            apply_safe_mode(&mut fresh).await?;
        }

        Ok(self.conn.insert(fresh))
    }
}

async fn apply_safe_mode(conn: &mut SessionConnection) -> Result<(), DbClientError> {
    let flavor = conn.flavor();
    match flavor.safe_mode_statement() {
        Some(statement) => conn
            .execute(statement)
            .await
            .map_err(DbClientError::SessionSetup),
        None => {
            warn!(
                %flavor,
                "safe mode requested but the flavor has no safe-update setting; skipping"
            );
            Ok(())
        }
    }
}
