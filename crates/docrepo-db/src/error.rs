//! Error types for docrepo-db.

use thiserror::Error;

/// Errors from opening a [`crate::DocDb`].
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The connection settings are incomplete or invalid.
    #[error("Connection not configured: {0}")]
    NotConfigured(#[from] docrepo_config::ConfigError),

    /// Underlying driver error (URI parsing, handshake, server selection).
    #[error("MongoDB error: {0}")]
    Driver(#[from] mongodb::error::Error),
}

/// Errors from [`crate::Repository`] operations.
///
/// `NotFound` is the typed absence condition raised by `delete`, `update` and
/// `find_one_or_fail`. `get_by_id` reports absence through `Other` instead, so
/// callers matching on `NotFound` do not catch it.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No document matched the filter of an operation that requires one.
    #[error("{0}")]
    NotFound(String),

    /// Underlying driver error, passed through unchanged.
    #[error("MongoDB error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// A typed document could not be converted to BSON.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] mongodb::bson::ser::Error),

    /// A stored document could not be converted to its typed shape.
    #[error("Deserialization failed: {0}")]
    Deserialize(#[from] mongodb::bson::de::Error),

    /// Catch-all for untyped failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// Whether this is the typed not-found condition.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
