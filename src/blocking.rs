//! Blocking facade over [`DbClient`] for single-threaded callers.

use tokio::runtime::{Builder, Runtime};

use crate::client::DbClient;
use crate::dsn::DsnProducer;
use crate::error::{DbClientError, DriverError};
use crate::results::QueryResult;
use crate::types::{Flavor, HandleStatus};

/// [`DbClient`] driven by its own current-thread runtime.
///
/// Each call blocks the calling thread until the database answers. Do not
/// use it from inside an async context; use [`DbClient`] there.
#[derive(Debug)]
pub struct BlockingDbClient {
    // declared before `runtime` so it drops first
    client: DbClient,
    runtime: Runtime,
}

impl BlockingDbClient {
    /// See [`DbClient::connect`].
    ///
    /// # Errors
    /// Same as [`DbClient::connect`]; a runtime that cannot start is reported
    /// as `Open`.
    pub fn connect(dsn_producer: impl DsnProducer + 'static) -> Result<Self, DbClientError> {
        let flavor = dsn_producer.flavor();
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DbClientError::Open {
                flavor,
                source: DriverError::Runtime(e),
            })?;
        let client = runtime.block_on(DbClient::connect(dsn_producer))?;
        Ok(Self { client, runtime })
    }

    /// See [`DbClient::query`].
    ///
    /// # Errors
    /// Same as [`DbClient::query`].
    pub fn query(&mut self, sql: &str) -> Result<Option<QueryResult>, DbClientError> {
        self.runtime.block_on(self.client.query(sql))
    }

    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.client.flavor()
    }

    #[must_use]
    pub fn handle_status(&self) -> HandleStatus {
        self.client.handle_status()
    }

    /// See [`DbClient::destroy`].
    ///
    /// # Errors
    /// Same as [`DbClient::destroy`].
    pub fn destroy(self) -> Result<(), DbClientError> {
        let Self { client, runtime } = self;
        runtime.block_on(client.destroy())
    }
}
