use std::future::Future;

use bb8::ManageConnection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};

/// bb8 manager for `MySQL` connections opened through sqlx.
#[derive(Clone)]
pub struct MySqlManager {
    pub(crate) options: MySqlConnectOptions,
}

impl MySqlManager {
    #[must_use]
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self { options }
    }
}

impl ManageConnection for MySqlManager {
    type Connection = MySqlConnection;
    type Error = sqlx::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let options = self.options.clone();
        async move {
            tracing::debug!(
                host = options.get_host(),
                port = options.get_port(),
                db = ?options.get_database(),
                "mysql connect start"
            );
            options.connect().await
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move { conn.ping().await }
    }

    // sqlx exposes no closed flag; dead sockets are caught by `is_valid` on checkout
    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}
