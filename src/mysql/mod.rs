//! `MySQL` flavor: sqlx connections pooled by bb8.

pub mod manager;
pub mod query;

pub use manager::MySqlManager;
pub(crate) use query::fetch_text;
