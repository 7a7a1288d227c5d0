//! Postgres flavor: `tokio-postgres` clients pooled by bb8.

pub mod manager;
pub mod query;

pub use manager::PgManager;
pub(crate) use query::fetch_text;
