use std::time::Duration;

use bb8::{ManageConnection, Pool};

#[cfg(feature = "mysql")]
use crate::mysql::MySqlManager;
#[cfg(feature = "postgres")]
use crate::postgres::PgManager;
use crate::types::HandleStatus;

/// Connections are recycled once they reach this age.
pub const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Upper bound on open connections; idle connections are capped by the same bound.
pub const MAX_OPEN_CONNECTIONS: u32 = 1;

/// How long a checkout waits for the single pooled connection.
pub const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Driver handle: a bb8 pool pinned to a single connection.
///
/// This enum wraps the pool for each supported flavor. Holding it does not
/// imply a live connection; see [`ping`](DbHandle::ping).
pub enum DbHandle {
    #[cfg(feature = "postgres")]
    Postgres {
        pool: Pool<PgManager>,
        manager: PgManager,
    },
    #[cfg(feature = "mysql")]
    MySql {
        pool: Pool<MySqlManager>,
        manager: MySqlManager,
    },
}

// Manual Debug implementation because the driver configs carry credentials
impl std::fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.status();
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres { .. } => f.debug_tuple("Postgres").field(&status).finish(),
            #[cfg(feature = "mysql")]
            Self::MySql { .. } => f.debug_tuple("MySql").field(&status).finish(),
        }
    }
}

/// Pool with the single-connection policy applied.
///
/// Built lazily: no connection is opened until the first checkout.
pub(crate) fn single_connection_pool<M: ManageConnection>(manager: M) -> Pool<M> {
    Pool::builder()
        .max_size(MAX_OPEN_CONNECTIONS)
        .max_lifetime(Some(MAX_CONNECTION_LIFETIME))
        .idle_timeout(None::<Duration>)
        .connection_timeout(CHECKOUT_TIMEOUT)
        .test_on_check_out(true)
        .retry_connection(false)
        .build_unchecked(manager)
}

pub(crate) fn pool_status<M: ManageConnection>(pool: &Pool<M>) -> HandleStatus {
    let state = pool.state();
    HandleStatus {
        open: state.connections,
        idle: state.idle_connections,
    }
}
