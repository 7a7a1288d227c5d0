use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::dsn::DsnError;

/// The SQL driver family a client connects with.
///
/// Parsing accepts the usual driver names for each family, so a flavor read
/// from a config file or command line maps onto a closed set:
/// ```rust
/// use sql_session::prelude::*;
///
/// assert_eq!("pgx".parse::<Flavor>().unwrap(), Flavor::Postgres);
/// assert_eq!("MariaDB".parse::<Flavor>().unwrap(), Flavor::MySql);
/// assert!("oracle".parse::<Flavor>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// `MySQL` and wire-compatible servers (`MariaDB`)
    #[value(name = "mysql", alias = "mariadb")]
    #[serde(alias = "mariadb")]
    MySql,
    /// `PostgreSQL`
    #[value(name = "postgres", alias = "postgresql", alias = "pgx")]
    #[serde(alias = "postgresql", alias = "pgx")]
    Postgres,
}

impl Flavor {
    /// Canonical identifier, also used as the URL scheme.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::MySql => "mysql",
            Flavor::Postgres => "postgres",
        }
    }

    #[must_use]
    pub fn default_port(self) -> u16 {
        match self {
            Flavor::MySql => 3306,
            Flavor::Postgres => 5432,
        }
    }

    /// Statement that turns on safe-update mode for a fresh session.
    ///
    /// Only `MySQL` has a session-level safe-update switch; Postgres returns
    /// `None` and the client skips session setup (with a warning) instead of
    /// sending `MySQL` syntax to a Postgres server.
    #[must_use]
    pub fn safe_mode_statement(self) -> Option<&'static str> {
        match self {
            Flavor::MySql => Some("SET SQL_SAFE_UPDATES = 1"),
            Flavor::Postgres => None,
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = DsnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Flavor::MySql),
            "postgres" | "postgresql" | "pgx" => Ok(Flavor::Postgres),
            other => Err(DsnError::UnknownFlavor(other.to_string())),
        }
    }
}

/// Connection counts reported by the handle's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HandleStatus {
    /// Connections currently open, checked out or idle
    pub open: u32,
    /// Open connections sitting idle in the pool
    pub idle: u32,
}

impl HandleStatus {
    /// Connections currently handed out by the pool.
    #[must_use]
    pub fn in_use(&self) -> u32 {
        self.open.saturating_sub(self.idle)
    }
}
