//! Connection-string producers consumed by [`DbClient`](crate::DbClient).

use thiserror::Error;

use crate::types::Flavor;

#[derive(Debug, Error)]
pub enum DsnError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unknown database flavor: {0}")]
    UnknownFlavor(String),

    #[error("invalid connection setting: {0}")]
    Invalid(String),
}

/// Source of connection parameters for a client.
///
/// The client derives the DSN and flavor once at construction and asks
/// [`is_safe_mode`](DsnProducer::is_safe_mode) again every time it opens a
/// fresh session, so session settings follow the producer.
pub trait DsnProducer: Send + Sync {
    /// Build the driver connection string.
    ///
    /// # Errors
    /// Returns `DsnError` when the parameters cannot form a valid DSN.
    fn to_dsn(&self) -> Result<String, DsnError>;

    fn flavor(&self) -> Flavor;

    fn is_safe_mode(&self) -> bool;
}

impl<P: DsnProducer + ?Sized> DsnProducer for Box<P> {
    fn to_dsn(&self) -> Result<String, DsnError> {
        (**self).to_dsn()
    }

    fn flavor(&self) -> Flavor {
        (**self).flavor()
    }

    fn is_safe_mode(&self) -> bool {
        (**self).is_safe_mode()
    }
}

impl<P: DsnProducer + ?Sized> DsnProducer for std::sync::Arc<P> {
    fn to_dsn(&self) -> Result<String, DsnError> {
        (**self).to_dsn()
    }

    fn flavor(&self) -> Flavor {
        (**self).flavor()
    }

    fn is_safe_mode(&self) -> bool {
        (**self).is_safe_mode()
    }
}
