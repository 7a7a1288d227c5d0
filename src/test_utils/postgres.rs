use postgresql_embedded::PostgreSQL;

use super::SHARED_RUNTIME;
use crate::client::DbClient;
use crate::config::ConnectionConfig;
use crate::types::Flavor;

/// Represents a running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    pub database_url: String,
}

impl EmbeddedPostgres {
    /// Connection settings pointing at the embedded database.
    #[must_use]
    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::from_url(Flavor::Postgres, self.database_url.clone())
    }
}

/// Set up an embedded `PostgreSQL` instance with database `dbname`.
///
/// # Errors
/// Returns an error if the embedded server cannot be set up or started, if the
/// database cannot be created, or if the post-start connectivity check fails.
pub fn setup_postgres_embedded(
    dbname: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();

        // Setup PostgreSQL binaries (bundled, so no download conflicts)
        postgresql.setup().await?;
        postgresql.start().await?;

        let settings = postgresql.settings();
        let port = settings.port;
        let database_url = format!(
            "postgres://{}:{}@{}:{port}/{dbname}",
            settings.username, settings.password, settings.host
        );

        postgresql.create_database(dbname).await?;
        tracing::info!(port, "embedded postgres started");

        // Quick connection test
        let client =
            DbClient::connect(ConnectionConfig::from_url(Flavor::Postgres, database_url.clone()))
                .await?;
        client.destroy().await?;

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            database_url,
        })
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}
